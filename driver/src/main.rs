use std::{env, io};

use driver::{config::DriverConfig, run};
use log::info;

fn main() -> io::Result<()> {
    env_logger::init();

    let path = env::args()
        .nth(1)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "usage: driver <config.json>"))?;

    let config = DriverConfig::from_path(&path)?;
    info!("loaded {path}");

    let outcome = run(&config)?;
    println!("{outcome}");

    Ok(())
}
