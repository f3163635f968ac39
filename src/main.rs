use clap::Parser;
use extsort::cli::{
    Args, exit_code, exit_codes, log_level_from_verbose, prompt_for_directory, run_cli,
};
use extsort::output::OutputFormatter;

fn main() {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(log_level_from_verbose(args.verbose))
        .init();

    let dir_path = match args.directory.clone() {
        Some(path) => Ok(path),
        None => prompt_for_directory(),
    };

    let code = match dir_path.and_then(|path| run_cli(&args, &path)) {
        Ok(report) => exit_code(&report),
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            exit_codes::FATAL
        }
    };

    std::process::exit(code);
}
