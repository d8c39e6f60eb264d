/// Sets the protocol fee fraction applied to pools created from now on.
/// The first call, made by a bootstrap authority, creates the fee
/// configuration with the caller as its sole authority.

use clamm_types::ClammResult;
use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::logic::authorize_fee_config_change;
use crate::state::{DexFeeConfig, StateKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetProtocolFeeParams {
    pub protocol_fee: Decimal,
}

pub fn handler(ctx: &mut Context<'_>, params: SetProtocolFeeParams) -> ClammResult<DexFeeConfig> {
    let caller = ctx.caller.clone();
    let config = ctx.config;
    let mut unit = ctx.work_unit();

    let existing: Option<DexFeeConfig> = unit.load(&StateKey::FeeConfig)?;
    authorize_fee_config_change(existing.as_ref(), &caller, config)?;

    let fee_config = match existing {
        Some(mut fee_config) => {
            fee_config.set_protocol_fee(params.protocol_fee)?;
            fee_config
        }
        None => DexFeeConfig::new(vec![caller.clone()], params.protocol_fee)?,
    };

    unit.save(&fee_config)?;
    unit.commit()?;

    info!("{caller} set protocol fee to {}", fee_config.protocol_fee);
    Ok(fee_config)
}
