use reddit2wallpaper::app::R2wApp;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    let app = R2wApp::init()?;
    app.run().await?;

    Ok(())
}
