//! Position fees, ownership transfer and lookups

mod common;

use common::*;

const FEE: FeeTier = FeeTier::Medium;

fn collect_all(ctx: &mut TestContext, user: &UserAlias, position_id: Option<String>) -> ClammResult<CollectPositionFeesResult> {
    let params = CollectPositionFeesParams {
        token0: token0(),
        token1: token1(),
        fee: FEE,
        amount0_requested: dec("1000000000"),
        amount1_requested: dec("1000000000"),
        tick_lower: -600,
        tick_upper: 600,
        position_id,
    };
    ctx.run(user, |c| instructions::collect_fees::handler(c, params))
}

fn collect(ctx: &mut TestContext, user: &UserAlias, amount0: &str, amount1: &str) -> ClammResult<CollectPositionFeesResult> {
    let params = CollectPositionFeesParams {
        token0: token0(),
        token1: token1(),
        fee: FEE,
        amount0_requested: dec(amount0),
        amount1_requested: dec(amount1),
        tick_lower: -600,
        tick_upper: 600,
        position_id: None,
    };
    ctx.run(user, |c| instructions::collect_fees::handler(c, params))
}

fn position(ctx: &mut TestContext, owner: &UserAlias, position_id: &str) -> ClammResult<DexPositionData> {
    let params = GetPositionParams {
        token0: token0(),
        token1: token1(),
        fee: FEE,
        tick_lower: -600,
        tick_upper: 600,
        position_id: Some(position_id.to_string()),
        owner: Some(owner.clone()),
    };
    ctx.run(owner, |c| instructions::query::get_position(c, params))
}

fn position_ids(ctx: &mut TestContext, user: UserAlias) -> ClammResult<Vec<String>> {
    let positions = ctx.run(&user.clone(), |c| {
        instructions::query::get_user_positions(c, GetUserPositionsParams { user })
    })?;
    Ok(positions.into_iter().map(|p| p.position_id).collect())
}

#[test]
fn test_liquidity_providers_earn_swap_fees() -> TestResult {
    let mut ctx = TestContext::new();
    ctx.create_pool(FEE, Decimal::ONE)?;
    let added = ctx.add_liquidity(&alice(), FEE, -600, 600, dec("1000"), dec("1000"))?;

    ctx.swap_unbounded(&bob(), FEE, dec("100"), true)?;
    ctx.swap_unbounded(&bob(), FEE, dec("100"), false)?;

    let before0 = ctx.balance(&alice(), &token0());
    let fees = collect_all(&mut ctx, &alice(), Some(added.position_id.clone()))?;

    // 0.3% of 100 less the protocol's tenth, up to rounding
    assert!(close(fees.amount0, dec("0.27"), "0.0000001"));
    assert!(close(fees.amount1, dec("0.27"), "0.0000001"));
    assert_eq!(ctx.balance(&alice(), &token0()), before0 + fees.amount0);

    // Fees are paid once
    let again = collect_all(&mut ctx, &alice(), Some(added.position_id.clone()))?;
    assert_eq!(again.amount0, Decimal::ZERO);
    assert_eq!(again.amount1, Decimal::ZERO);

    // Liquidity is untouched by collection
    assert_eq!(position(&mut ctx, &alice(), &added.position_id)?.liquidity, added.liquidity);
    Ok(())
}

#[test]
fn test_fees_split_between_overlapping_positions() -> TestResult {
    let mut ctx = TestContext::new();
    ctx.create_pool(FEE, Decimal::ONE)?;
    let first = ctx.add_liquidity(&alice(), FEE, -600, 600, dec("1000"), dec("1000"))?;
    let second = ctx.add_liquidity(&bob(), FEE, -600, 600, dec("3000"), dec("3000"))?;

    ctx.swap_unbounded(&bob(), FEE, dec("400"), true)?;

    let alice_fees = collect_all(&mut ctx, &alice(), None)?;
    let bob_fees = collect_all(&mut ctx, &bob(), None)?;
    assert_eq!(alice_fees.position_id, first.position_id);
    assert_eq!(bob_fees.position_id, second.position_id);
    assert!(close(bob_fees.amount0, alice_fees.amount0 * dec("3"), "0.0000001"));
    Ok(())
}

#[test]
fn test_poke_settles_fees_without_moving_liquidity() -> TestResult {
    let mut ctx = TestContext::new();
    ctx.create_pool(FEE, Decimal::ONE)?;
    let added = ctx.add_liquidity(&alice(), FEE, -600, 600, dec("1000"), dec("1000"))?;
    ctx.swap_unbounded(&bob(), FEE, dec("100"), true)?;

    let params = RemoveLiquidityParams {
        token0: token0(),
        token1: token1(),
        fee: FEE,
        tick_lower: -600,
        tick_upper: 600,
        amount: Decimal::ZERO,
        amount0_min: Decimal::ZERO,
        amount1_min: Decimal::ZERO,
        position_id: None,
    };
    let poked = ctx.run(&alice(), |c| instructions::liquidity_remove::handler(c, params))?;
    assert_eq!((poked.amount0, poked.amount1), (Decimal::ZERO, Decimal::ZERO));

    let stored = position(&mut ctx, &alice(), &added.position_id)?;
    assert_eq!(stored.liquidity, added.liquidity);
    assert!(stored.tokens_owed_0 > Decimal::ZERO);
    assert_eq!(stored.tokens_owed_1, Decimal::ZERO);
    Ok(())
}

#[test]
fn test_transfer_position() -> TestResult {
    let mut ctx = TestContext::new();
    let created = ctx.create_pool(FEE, Decimal::ONE)?;
    let added = ctx.add_liquidity(&alice(), FEE, -600, 600, dec("1000"), dec("1000"))?;

    let params = TransferDexPositionParams {
        to_user: bob(),
        token0: token0(),
        token1: token1(),
        fee: FEE,
        position_id: added.position_id.clone(),
    };

    let err = ctx
        .run(&bob(), |c| instructions::transfer_position::handler(c, params.clone()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let moved = ctx.run(&alice(), |c| instructions::transfer_position::handler(c, params.clone()))?;
    assert_eq!((moved.tick_lower, moved.tick_upper), (-600, 600));
    assert_eq!(moved.to, bob());

    // Alice no longer owns it
    assert_eq!(
        position(&mut ctx, &alice(), &added.position_id).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    let err = ctx
        .run(&alice(), |c| instructions::transfer_position::handler(c, params))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let owned = position(&mut ctx, &bob(), &added.position_id)?;
    assert_eq!(owned.liquidity, added.liquidity);

    let listed = ctx.run(&bob(), |c| {
        instructions::query::get_user_positions(c, GetUserPositionsParams { user: bob() })
    })?;
    assert_eq!(
        listed,
        vec![UserPosition {
            pool_hash: created.pool_hash,
            tick_lower: -600,
            tick_upper: 600,
            position_id: added.position_id,
        }]
    );
    let alice_listed = ctx.run(&alice(), |c| {
        instructions::query::get_user_positions(c, GetUserPositionsParams { user: alice() })
    })?;
    assert!(alice_listed.is_empty());
    Ok(())
}

#[test]
fn test_unknown_position_id_is_not_found() -> TestResult {
    let mut ctx = TestContext::new();
    ctx.create_pool(FEE, Decimal::ONE)?;
    ctx.add_liquidity(&alice(), FEE, -600, 600, dec("1000"), dec("1000"))?;

    let err = collect_all(&mut ctx, &alice(), Some("no-such-position".to_string())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    // Bob holds nothing in this range
    let err = collect_all(&mut ctx, &bob(), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let params = AddLiquidityParams {
        token0: token0(),
        token1: token1(),
        fee: FEE,
        tick_lower: -600,
        tick_upper: 600,
        amount0_desired: dec("10"),
        amount1_desired: dec("10"),
        amount0_min: Decimal::ZERO,
        amount1_min: Decimal::ZERO,
        position_id: Some("no-such-position".to_string()),
        unique_key: None,
    };
    let err = ctx
        .run(&alice(), |c| instructions::liquidity_add::handler(c, params))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    Ok(())
}

#[test]
fn test_collect_capped_at_pool_balance() -> TestResult {
    let mut ctx = TestContext::new();
    ctx.create_pool(FEE, Decimal::ONE)?;
    let added = ctx.add_liquidity(&alice(), FEE, -600, 600, dec("1000"), dec("1000"))?;
    ctx.swap_unbounded(&bob(), FEE, dec("100"), true)?;

    // Nothing requested, so this only settles fees
    let settled = collect(&mut ctx, &alice(), "0", "0")?;
    assert_eq!((settled.amount0, settled.amount1), (Decimal::ZERO, Decimal::ZERO));
    let owed0 = position(&mut ctx, &alice(), &added.position_id)?.tokens_owed_0;
    assert!(owed0 > dec("0.1"));

    ctx.drain_pool(FEE, &token0(), dec("0.1"));
    let before0 = ctx.balance(&alice(), &token0());
    let capped = collect_all(&mut ctx, &alice(), Some(added.position_id.clone()))?;
    assert_eq!(capped.amount0, dec("0.1"));
    assert_eq!(capped.amount1, Decimal::ZERO);
    assert_eq!(ctx.balance(&alice(), &token0()), before0 + dec("0.1"));
    assert_eq!(ctx.balance(&capped.pool_alias, &token0()), Decimal::ZERO);

    // The unpaid remainder stays owed
    let stored = position(&mut ctx, &alice(), &added.position_id)?;
    assert_eq!(stored.tokens_owed_0, owed0 - dec("0.1"));
    Ok(())
}

#[test]
fn test_readding_after_transfer_opens_a_new_position() -> TestResult {
    let mut ctx = TestContext::new();
    ctx.create_pool(FEE, Decimal::ONE)?;
    let given = ctx.add_liquidity(&alice(), FEE, -600, 600, dec("1000"), dec("1000"))?;

    let params = TransferDexPositionParams {
        to_user: bob(),
        token0: token0(),
        token1: token1(),
        fee: FEE,
        position_id: given.position_id.clone(),
    };
    ctx.run(&alice(), |c| instructions::transfer_position::handler(c, params))?;

    let readded = ctx.add_liquidity(&alice(), FEE, -600, 600, dec("10"), dec("10"))?;
    assert_ne!(readded.position_id, given.position_id);

    // Bob's position is untouched by Alice's deposit
    assert_eq!(position(&mut ctx, &bob(), &given.position_id)?.liquidity, given.liquidity);
    assert_eq!(position(&mut ctx, &alice(), &readded.position_id)?.liquidity, readded.liquidity);

    assert_eq!(position_ids(&mut ctx, bob())?, vec![given.position_id.clone()]);
    assert_eq!(position_ids(&mut ctx, alice())?, vec![readded.position_id.clone()]);

    // Alice cannot reach the transferred position
    let err = collect_all(&mut ctx, &alice(), Some(given.position_id.clone())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    Ok(())
}
