/// Replaces the list of identities allowed to administer protocol fees.
/// Before any configuration exists only a bootstrap authority may call it,
/// and the new configuration starts from the engine's default protocol fee.

use clamm_types::{ClammResult, UserAlias};
use log::info;
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::logic::authorize_fee_config_change;
use crate::state::{DexFeeConfig, StateKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureDexFeeAddressParams {
    pub new_authorities: Vec<UserAlias>,
}

pub fn handler(ctx: &mut Context<'_>, params: ConfigureDexFeeAddressParams) -> ClammResult<DexFeeConfig> {
    let caller = ctx.caller.clone();
    let config = ctx.config;
    let mut unit = ctx.work_unit();

    let existing: Option<DexFeeConfig> = unit.load(&StateKey::FeeConfig)?;
    authorize_fee_config_change(existing.as_ref(), &caller, config)?;

    let fee_config = match existing {
        Some(mut fee_config) => {
            fee_config.set_authorities(params.new_authorities)?;
            fee_config
        }
        None => DexFeeConfig::new(params.new_authorities, config.default_protocol_fee)?,
    };

    unit.save(&fee_config)?;
    unit.commit()?;

    info!("{caller} set fee authorities to {:?}", fee_config.authorities);
    Ok(fee_config)
}
