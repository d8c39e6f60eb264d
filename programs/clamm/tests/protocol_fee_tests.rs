//! Fee configuration authority and protocol fee collection

mod common;

use common::*;

const FEE: FeeTier = FeeTier::Medium;

fn set_fee(ctx: &mut TestContext, caller: &UserAlias, protocol_fee: Decimal) -> ClammResult<DexFeeConfig> {
    ctx.run(caller, |c| {
        instructions::set_protocol_fee::handler(c, SetProtocolFeeParams { protocol_fee })
    })
}

fn set_authorities(ctx: &mut TestContext, caller: &UserAlias, new_authorities: Vec<UserAlias>) -> ClammResult<DexFeeConfig> {
    ctx.run(caller, |c| {
        instructions::configure_fee_authorities::handler(c, ConfigureDexFeeAddressParams { new_authorities })
    })
}

fn collect(ctx: &mut TestContext, caller: &UserAlias, recipient: UserAlias) -> ClammResult<CollectProtocolFeesResult> {
    let params = CollectProtocolFeesParams {
        token0: token0(),
        token1: token1(),
        fee: FEE,
        recipient,
    };
    ctx.run(caller, |c| instructions::fee_collect_protocol::handler(c, params))
}

#[test]
fn test_bootstrap_creates_configuration() -> TestResult {
    let mut ctx = TestContext::new();

    let err = set_fee(&mut ctx, &alice(), dec("0.2")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let config = set_fee(&mut ctx, &admin(), dec("0.2"))?;
    assert_eq!(config.authorities, vec![admin()]);
    assert_eq!(config.protocol_fee, dec("0.2"));

    let fetched = ctx.run(&bob(), |c| instructions::query::get_dex_fee_config(c))?;
    assert_eq!(fetched, config);

    // New pools pick up the configured fraction
    ctx.create_pool(FEE, Decimal::ONE)?;
    assert_eq!(ctx.pool(FEE).protocol_fee, dec("0.2"));
    Ok(())
}

#[test]
fn test_authority_handover() -> TestResult {
    let mut ctx = TestContext::new();
    let config = set_authorities(&mut ctx, &admin(), vec![alice()])?;
    assert_eq!(config.protocol_fee, ctx.config.default_protocol_fee);

    // The bootstrap role no longer applies once a configuration exists
    let err = set_fee(&mut ctx, &admin(), dec("0.3")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    set_fee(&mut ctx, &alice(), dec("0.3"))?;
    let config = set_authorities(&mut ctx, &alice(), vec![alice(), bob(), bob()])?;
    assert_eq!(config.authorities, vec![alice(), bob()]);
    assert_eq!(config.protocol_fee, dec("0.3"));

    let err = set_authorities(&mut ctx, &alice(), vec![]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = set_fee(&mut ctx, &bob(), Decimal::ONE).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    Ok(())
}

#[test]
fn test_collect_without_configuration_is_not_found() -> TestResult {
    let mut ctx = TestContext::new();
    ctx.create_pool(FEE, Decimal::ONE)?;
    let err = collect(&mut ctx, &admin(), admin()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    Ok(())
}

#[test]
fn test_collect_by_non_authority_is_unauthorized() -> TestResult {
    let mut ctx = TestContext::new();
    ctx.create_pool(FEE, Decimal::ONE)?;
    set_authorities(&mut ctx, &admin(), vec![admin()])?;
    let err = collect(&mut ctx, &bob(), bob()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    Ok(())
}

#[test]
fn test_collect_capped_at_pool_balance() -> TestResult {
    let mut ctx = TestContext::new();
    ctx.create_pool(FEE, Decimal::ONE)?;
    set_authorities(&mut ctx, &admin(), vec![admin()])?;

    let mut pool = ctx.pool(FEE);
    pool.protocol_fees_token_0 = dec("10000");
    pool.protocol_fees_token_1 = dec("10");
    ctx.put_pool(&pool);
    let alias = pool.pool_alias();
    ctx.bank.mint(&alias, &token0(), dec("1000"));
    ctx.bank.mint(&alias, &token1(), dec("10"));

    let treasury = UserAlias::new("client|treasury");
    let collected = collect(&mut ctx, &admin(), treasury.clone())?;
    assert_eq!(collected.amount0, dec("1000"));
    assert_eq!(collected.amount1, dec("10"));
    assert_eq!(ctx.balance(&treasury, &token0()), dec("1000"));
    assert_eq!(ctx.balance(&alias, &token0()), Decimal::ZERO);

    let after = ctx.pool(FEE);
    assert_eq!(after.protocol_fees_token_0, dec("9000"));
    assert_eq!(after.protocol_fees_token_1, Decimal::ZERO);
    Ok(())
}

#[test]
fn test_collect_swap_fees() -> TestResult {
    let mut ctx = TestContext::new();
    ctx.create_pool(FEE, Decimal::ONE)?;
    ctx.add_liquidity(&alice(), FEE, -600, 600, dec("1000"), dec("1000"))?;
    ctx.swap_unbounded(&bob(), FEE, dec("100"), true)?;
    set_authorities(&mut ctx, &admin(), vec![admin()])?;

    let accrued = ctx.pool(FEE).protocol_fees_token_0;
    assert!(accrued > Decimal::ZERO);

    let collected = collect(&mut ctx, &admin(), admin())?;
    assert!(close(collected.amount0, accrued, "0.00000001"));
    assert_eq!(collected.amount1, Decimal::ZERO);
    assert!(ctx.pool(FEE).protocol_fees_token_0 < dec("0.00000001"));
    Ok(())
}

#[test]
fn test_pool_protocol_fee_override() -> TestResult {
    let mut ctx = TestContext::new();
    ctx.create_pool(FEE, Decimal::ONE)?;
    set_authorities(&mut ctx, &admin(), vec![admin()])?;

    let params = ConfigurePoolProtocolFeeParams {
        token0: token0(),
        token1: token1(),
        fee: FEE,
        protocol_fee: Decimal::ZERO,
    };
    let err = ctx
        .run(&bob(), |c| instructions::configure_pool_protocol_fee::handler(c, params.clone()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let pool = ctx.run(&admin(), |c| instructions::configure_pool_protocol_fee::handler(c, params))?;
    assert_eq!(pool.protocol_fee, Decimal::ZERO);

    ctx.add_liquidity(&alice(), FEE, -600, 600, dec("1000"), dec("1000"))?;
    ctx.swap_unbounded(&bob(), FEE, dec("100"), true)?;
    assert_eq!(ctx.pool(FEE).protocol_fees_token_0, Decimal::ZERO);
    Ok(())
}
