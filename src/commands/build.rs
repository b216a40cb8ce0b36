//! Build the static site

use anyhow::Result;

use crate::generator::Generator;
use crate::Site;

/// Generate every page, post and the blog index
pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let generator = Generator::new(site)?;
    let stats = generator.generate()?;

    tracing::info!(
        "Generated {} pages and {} posts ({} style files) in {:.2}s",
        stats.pages,
        stats.posts,
        stats.styles,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
