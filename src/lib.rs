// for logging (debug mostly, switched at compile time in cargo.toml)

use lazy_static::lazy_static;

pub mod dist;
pub mod error;
pub mod optics;
pub mod prelude;

lazy_static! {
    static ref LOG: u64 = init_log();
}

// install a logger facility
fn init_log() -> u64 {
    let _res = env_logger::try_init();
    log::info!("\n ************** initializing logger *****************\n");
    1
}

// end of tests
