use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = chirp::CliArgs::parse();

    let default_filter = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    chirp::run(args)
}
