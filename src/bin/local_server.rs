use fitzone::{
    server,
    util::{config::Config, logging},
    App,
};

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    logging::init(&config.logging);

    let app = App::from_config(&config).await?;
    let _ = server::build(app, &config.server).launch().await?;

    Ok(())
}
