//! Stage kind to washer command mapping
//!
//! Shared by the tick-driven sequencer and the batch runner so both paths
//! drive the hardware identically.

use crate::recipe::{Stage, StageKind};
use crate::traits::{HardwareError, WasherIo};

/// Issue the commands for entering `stage`
///
/// Every stage starts from a clean baseline (`stop_all`), then turns on
/// what its kind needs:
///
/// | Kind    | Commands after the baseline                        |
/// |---------|----------------------------------------------------|
/// | Fill    | fill, dose (if a chemical is set)                  |
/// | Dose    | fill (if water is set), dose                       |
/// | Agitate | fill (if water), dose (if chemical), agitate       |
/// | Drain   | drain open                                         |
/// | Spin    | drain open, spin                                   |
/// | Custom  | nothing                                            |
pub fn apply_stage<H: WasherIo + ?Sized>(washer: &mut H, stage: &Stage) -> Result<(), HardwareError> {
    washer.stop_all()?;

    match stage.kind {
        StageKind::Fill => {
            washer.fill(stage.water)?;
            if stage.chemical.is_some() {
                washer.dose(stage.chemical)?;
            }
        }
        StageKind::Dose => {
            if stage.uses_water() {
                washer.fill(stage.water)?;
            }
            washer.dose(stage.chemical)?;
        }
        StageKind::Agitate => {
            if stage.uses_water() {
                washer.fill(stage.water)?;
            }
            if stage.chemical.is_some() {
                washer.dose(stage.chemical)?;
            }
            washer.agitate(stage.speed)?;
        }
        StageKind::Drain => washer.drain_open(true)?,
        StageKind::Spin => {
            washer.drain_open(true)?;
            washer.spin(stage.speed)?;
        }
        StageKind::Custom => {}
    }

    Ok(())
}

/// Turn everything off and open the drain
///
/// Both commands are always attempted; the first error is returned.
pub fn safe_stop<H: WasherIo + ?Sized>(washer: &mut H) -> Result<(), HardwareError> {
    let stopped = washer.stop_all();
    let drained = washer.drain_open(true);
    stopped.and(drained)
}
