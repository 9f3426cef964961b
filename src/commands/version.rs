use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("levelcheck version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
