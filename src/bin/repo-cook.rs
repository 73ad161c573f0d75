use clap::Parser;

use repo_cook::config::Config;

#[tokio::main]
async fn main() -> Result<(), i32> {
    let config = Config::parse();

    config.logging.init();

    if config.show_conf {
        let json = config.to_pretty_json().map_err(|e| {
            log::error!("Error: {}", e);
            1
        })?;
        log::info!("Used configuration:\n{}", json);
    }

    repo_cook::run(&config).await.map_err(|e| {
        log::error!("Error: {}", e);
        1
    })?;

    log::info!("Success.");
    Ok(())
}
