use webmirror::commands::command_argument_builder;
use webmirror::{handle_mirror, init_tracing, listen_for_interrupt};
use webmirror_core::print_banner;

#[tokio::main]
async fn main() {
    let matches = command_argument_builder().get_matches();
    let quiet = matches.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    init_tracing(matches.get_count("verbose"), quiet);
    listen_for_interrupt();

    let exit_code = handle_mirror(&matches).await;
    std::process::exit(exit_code);
}
