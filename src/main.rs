use appcmd::{
    dispatcher::Dispatcher,
    logging::{LogLevel, Logger},
};

fn main() {
    // Errors before argument parsing are still reported
    let logger = Logger::install(LogLevel::Error);

    let args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    let code = Dispatcher::standard(logger).run(args);
    std::process::exit(code);
}
