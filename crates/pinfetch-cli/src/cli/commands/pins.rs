//! Pins command: list the compiled-in pin set.

use anyhow::Result;
use pinfetch_core::pinning::default_pins;

pub fn run_pins() -> Result<()> {
    let pins = default_pins();
    println!("{:<45} THUMBPRINT (SHA-1)", "HOST PREFIX");
    for pin in pins.pins() {
        println!("{:<45} {}", pin.host_prefix, pin.thumbprint);
    }
    Ok(())
}
