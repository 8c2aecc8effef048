use peon_core::{Config, PeonPaths};

pub fn pause() -> Result<(), Box<dyn std::error::Error>> {
    let paths = PeonPaths::from_env();
    std::fs::create_dir_all(paths.root())?;
    std::fs::write(paths.pause_marker(), "")?;
    println!("paused");
    Ok(())
}

pub fn resume() -> Result<(), Box<dyn std::error::Error>> {
    let paths = PeonPaths::from_env();
    match std::fs::remove_file(paths.pause_marker()) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    println!("resumed");
    Ok(())
}

pub fn status() -> Result<(), Box<dyn std::error::Error>> {
    let paths = PeonPaths::from_env();
    let config = Config::load(&paths.config());
    let status = serde_json::json!({
        "dir": paths.root(),
        "enabled": config.enabled,
        "paused": paths.pause_marker().exists(),
        "active_pack": config.active_pack,
        "volume": config.volume,
        "categories": config.categories.resolved(),
    });
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
