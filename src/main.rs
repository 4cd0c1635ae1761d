use clap::Parser;
use craftruv::cli::commands::{completions, config, estimate, furniture, init, material};
use craftruv::cli::{logging, Cli, Commands};
use miette::Result;

fn main() -> Result<()> {
    // Reset SIGPIPE so piping into `head` terminates quietly instead of panicking
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    logging::init(&global);

    match cli.command {
        Commands::Init(args) => init::run(args),
        Commands::Estimate(args) => estimate::run(args, &global),
        Commands::Material(cmd) => material::run(cmd, &global),
        Commands::Furniture(cmd) => furniture::run(cmd, &global),
        Commands::Config(cmd) => config::run(cmd, &global),
        Commands::Completions(args) => completions::run(args),
    }
}
