use mortgage_sim::api::ConfigError;
use std::env;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let raw_args: Vec<String> = env::args().collect();
    if raw_args.get(1).map(|s| s.as_str()) == Some("serve") {
        let port = raw_args
            .get(2)
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);
        if let Err(e) = mortgage_sim::api::run_http_server(port).await {
            log::error!("server error: {e}");
            std::process::exit(1);
        }
        return;
    }

    match mortgage_sim::api::run_cli(raw_args) {
        Ok(json) => println!("{json}"),
        Err(ConfigError::Help(text)) => print!("{text}"),
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Usage: mortgage-sim [OPTIONS] | mortgage-sim serve [port]");
            std::process::exit(2);
        }
    }
}
