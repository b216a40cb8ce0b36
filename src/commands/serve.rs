//! Run the development server

use anyhow::Result;

use crate::generator::Generator;
use crate::server;
use crate::Site;

/// Compile templates once, then serve until the process is stopped
pub async fn run(site: &Site, ip: &str, port: u16, open: bool) -> Result<()> {
    let generator = Generator::new(site)?;
    tracing::info!(
        "Serving {:?} and rendering pages from {:?}",
        site.public_dir,
        site.content_dir
    );
    server::start(generator, ip, port, open).await
}
