pub mod crawl;
pub mod report;

use colored::Colorize;

const BANNER: &str = r#"
                 __         _
 _    _____ ___ / /  __ _  (_)__________  ____
| |/|/ / -_) _ \/ _ \/  ' \/ / __/ __/ _ \/ __/
|__,__/\__/_.__/_//_/_/_/_/_/_/ /_/  \___/_/
"#;

pub fn print_banner() {
    println!("{}", BANNER.bright_cyan().bold());
    println!(
        "  {} {}\n",
        "same-domain website mirroring crawler".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).as_str().bright_black()
    );
}
