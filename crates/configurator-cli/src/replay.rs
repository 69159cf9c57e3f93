//! Selection scripts: a JSON list of steps applied through the cascade
//! controller, the way a UI session would.
//!
//! ```json
//! [
//!   { "op": "setDriver", "field": "wallDepth", "value": "200" },
//!   { "op": "setQuantity", "slot": "windows", "id": "SKYLARK200_M1", "quantity": 2 },
//!   { "op": "setSingle", "slot": "cladding", "id": "cedar" }
//! ]
//! ```

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use configurator_engine::CascadeController;
use configurator_model::{DependentSlot, DriverField};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ReplayStep {
    /// A missing or blank value unsets the driver.
    SetDriver {
        field: DriverField,
        #[serde(default)]
        value: Option<String>,
    },
    SetQuantity {
        slot: DependentSlot,
        id: String,
        quantity: i64,
    },
    AdjustQuantity {
        slot: DependentSlot,
        id: String,
        delta: i64,
    },
    SetSingle {
        slot: DependentSlot,
        #[serde(default)]
        id: Option<String>,
    },
    ResetSlot {
        slot: DependentSlot,
    },
    Reset,
}

impl ReplayStep {
    pub fn apply(&self, controller: &mut CascadeController) -> configurator_engine::Result<()> {
        match self {
            ReplayStep::SetDriver { field, value } => {
                controller.set_driver_str(*field, value.as_deref())
            }
            ReplayStep::SetQuantity { slot, id, quantity } => {
                controller.set_quantity(*slot, id, *quantity)
            }
            ReplayStep::AdjustQuantity { slot, id, delta } => controller
                .adjust_quantity(*slot, id, *delta)
                .map(|_| ()),
            ReplayStep::SetSingle { slot, id } => controller.set_single(*slot, id.as_deref()),
            ReplayStep::ResetSlot { slot } => {
                controller.reset_slot(*slot);
                Ok(())
            }
            ReplayStep::Reset => controller.reset(),
        }
    }
}

impl fmt::Display for ReplayStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayStep::SetDriver { field, value } => {
                write!(f, "set {field} = {}", value.as_deref().unwrap_or("<unset>"))
            }
            ReplayStep::SetQuantity { slot, id, quantity } => {
                write!(f, "set {slot} {id} x{quantity}")
            }
            ReplayStep::AdjustQuantity { slot, id, delta } => {
                write!(f, "adjust {slot} {id} by {delta:+}")
            }
            ReplayStep::SetSingle { slot, id } => {
                write!(f, "set {slot} = {}", id.as_deref().unwrap_or("<none>"))
            }
            ReplayStep::ResetSlot { slot } => write!(f, "reset {slot}"),
            ReplayStep::Reset => write!(f, "reset all"),
        }
    }
}

/// A step the controller refused.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedStep {
    /// Zero-based position in the script.
    pub index: usize,
    pub step: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayOutcome {
    pub applied: usize,
    pub rejected: Vec<RejectedStep>,
}

pub fn parse_script(contents: &str) -> serde_json::Result<Vec<ReplayStep>> {
    serde_json::from_str(contents)
}

pub fn load_script(path: &Path) -> Result<Vec<ReplayStep>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read script {}", path.display()))?;
    parse_script(&contents).with_context(|| format!("parse script {}", path.display()))
}

/// Apply `steps` in order. Without `keep_going` the first rejected step
/// aborts the run; with it, rejections are collected and the run continues.
pub fn run_script(
    controller: &mut CascadeController,
    steps: &[ReplayStep],
    keep_going: bool,
) -> Result<ReplayOutcome> {
    let span = info_span!("replay", steps = steps.len());
    let _guard = span.enter();

    let mut outcome = ReplayOutcome::default();
    for (index, step) in steps.iter().enumerate() {
        match step.apply(controller) {
            Ok(()) => {
                debug!(index, %step, "applied");
                outcome.applied += 1;
            }
            Err(error) if keep_going => {
                warn!(index, %step, %error, "step rejected");
                outcome.rejected.push(RejectedStep {
                    index,
                    step: step.to_string(),
                    error: error.to_string(),
                });
            }
            Err(error) => {
                return Err(anyhow::Error::new(error).context(format!("step {index} ({step})")));
            }
        }
    }
    Ok(outcome)
}
