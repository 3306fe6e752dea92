use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use plexfin_config::PathManager;
use plexfin_core::CacheManager;

pub async fn run_clear(cache: bool, output: &Output) -> Result<()> {
    if !cache {
        output.warn("No clear option specified. Use --cache");
        return Ok(());
    }

    let path_manager = PathManager::default();
    let manager = CacheManager::new(&path_manager)
        .map_err(|e| eyre!("Failed to open cache: {}", e))?;
    manager
        .clear()
        .map_err(|e| eyre!("Failed to clear cache: {}", e))?;
    output.success("Cleared cached Plex and Jellyfin snapshots");
    Ok(())
}
