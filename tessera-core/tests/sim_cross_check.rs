//! Fixed precision curves checked against the unbounded reference models.

use anchor_lang::Result;
use proptest::prelude::*;
use tessera_core::curve::{CurveParameters, SwapCurve, TradeDirection};
use tessera_sim::{
  ConstantPriceModel, ConstantProductModel, OffsetModel, StableSwapModel,
};

const SUPPLY: u128 = 1_000_000_000;

fn direction(a_to_b: bool) -> TradeDirection {
  if a_to_b {
    TradeDirection::AtoB
  } else {
    TradeDirection::BtoA
  }
}

#[test]
fn stable_reference_example() -> Result<()> {
  let curve = CurveParameters::stable_swap(100, 6, 6);
  let out = curve.swap_without_fees(
    10_000_000,
    1_000_000_000,
    1_000_000_000,
    TradeDirection::AtoB,
  )?;
  let model = StableSwapModel::new(100, [1_000_000_000, 1_000_000_000], [6, 6])
    .expect("model");
  let expected = model.sim_dy(0, 1, 10_000_000).expect("dy");
  assert!(out.destination_amount_swapped.abs_diff(expected) <= 1);
  assert!(out.destination_amount_swapped < 10_000_000);
  Ok(())
}

#[test]
fn stable_mixed_decimals_reference() -> Result<()> {
  // 1_000 of a 6 decimal token against 1_000 of a 9 decimal token
  let curve = CurveParameters::stable_swap(200, 6, 9);
  let out = curve.swap_without_fees(
    1_000_000,
    1_000_000_000,
    1_000_000_000_000,
    TradeDirection::AtoB,
  )?;
  let model =
    StableSwapModel::new(200, [1_000_000_000, 1_000_000_000_000], [6, 9])
      .expect("model");
  let expected = model.sim_dy(0, 1, 1_000_000).expect("dy");
  assert!(out.destination_amount_swapped.abs_diff(expected) <= 1);
  Ok(())
}

proptest! {
  #[test]
  fn constant_product_matches_reference(
    reserve_a in 1_000..1_000_000_000_000u128,
    reserve_b in 1_000..1_000_000_000_000u128,
    amount in 1..1_000_000_000u128,
    a_to_b in any::<bool>(),
  ) {
    let trade_direction = direction(a_to_b);
    let (source, destination) =
      trade_direction.source_first(reserve_a, reserve_b);
    let out = CurveParameters::ConstantProduct
      .swap_without_fees(amount, source, destination, trade_direction)
      .expect("swap");
    let expected = ConstantProductModel
      .swap(amount, source, destination)
      .expect("model");
    prop_assert_eq!(out.destination_amount_swapped, expected);
  }

  #[test]
  fn constant_product_single_sided_matches_reference(
    reserve_a in 1_000..1_000_000_000_000u128,
    reserve_b in 1_000..1_000_000_000_000u128,
    amount in 1..1_000_000_000u128,
  ) {
    let curve = CurveParameters::ConstantProduct;
    let minted = curve
      .deposit_single_token_type(
        amount,
        reserve_a,
        reserve_b,
        SUPPLY,
        TradeDirection::AtoB,
      )
      .expect("deposit");
    let expected = ConstantProductModel
      .deposit_single(amount, reserve_a, SUPPLY)
      .expect("model");
    prop_assert_eq!(minted, expected);

    prop_assume!(amount < reserve_b);
    let burned = curve
      .withdraw_single_token_type_exact_out(
        amount,
        reserve_a,
        reserve_b,
        SUPPLY,
        TradeDirection::BtoA,
      )
      .expect("withdraw");
    let expected = ConstantProductModel
      .withdraw_single_exact_out(amount, reserve_b, SUPPLY)
      .expect("model");
    prop_assert_eq!(burned, expected);
  }

  #[test]
  fn constant_price_matches_reference(
    price in 1..1_000_000u64,
    amount in 1..1_000_000_000u128,
    a_to_b in any::<bool>(),
  ) {
    let curve = CurveParameters::constant_price(price);
    let reserve = u128::MAX / 4;
    let out = curve
      .swap_without_fees(amount, reserve, reserve, direction(a_to_b))
      .expect("swap");
    let (consumed, produced) = ConstantPriceModel { token_b_price: price }
      .swap(amount, a_to_b)
      .expect("model");
    prop_assert_eq!(out.source_amount_swapped, consumed);
    prop_assert_eq!(out.destination_amount_swapped, produced);
  }

  #[test]
  fn constant_price_deposit_matches_reference(
    price in 1..1_000_000u64,
    reserve_a in 1..1_000_000_000_000u128,
    reserve_b in 0..1_000_000_000_000u128,
    amount in 1..1_000_000_000u128,
    a_to_b in any::<bool>(),
  ) {
    let minted = CurveParameters::constant_price(price)
      .deposit_single_token_type(
        amount,
        reserve_a,
        reserve_b,
        SUPPLY,
        direction(a_to_b),
      )
      .expect("deposit");
    let expected = ConstantPriceModel { token_b_price: price }
      .deposit_single(amount, reserve_a, reserve_b, SUPPLY, a_to_b)
      .expect("model");
    prop_assert_eq!(minted, expected);
  }

  #[test]
  fn offset_matches_reference(
    offset in 1..1_000_000_000_000u64,
    reserve_a in 1_000..1_000_000_000_000u128,
    reserve_b in 0..1_000_000_000_000u128,
    amount in 1..1_000_000_000u128,
    a_to_b in any::<bool>(),
  ) {
    let trade_direction = direction(a_to_b);
    let (source, destination) =
      trade_direction.source_first(reserve_a, reserve_b);
    let out = CurveParameters::offset(offset).swap_without_fees(
      amount,
      source,
      destination,
      trade_direction,
    );
    let expected = OffsetModel { token_b_offset: offset }
      .swap(amount, reserve_a, reserve_b, a_to_b);
    match expected {
      Some(expected) => {
        let out = out.expect("swap");
        prop_assert_eq!(out.destination_amount_swapped, expected);
      }
      None => prop_assert!(out.is_err()),
    }
  }

  #[test]
  fn stable_swap_matches_reference(
    amp in 2..10_000u64,
    reserve_a in 1_000_000_000..1_000_000_000_000u128,
    reserve_b in 1_000_000_000..1_000_000_000_000u128,
    amount in 1..1_000_000_000u128,
    a_to_b in any::<bool>(),
  ) {
    let trade_direction = direction(a_to_b);
    let (source, destination) =
      trade_direction.source_first(reserve_a, reserve_b);
    let out = CurveParameters::stable_swap(amp, 6, 6)
      .swap_without_fees(amount, source, destination, trade_direction)
      .expect("swap");
    let model = StableSwapModel::new(amp, [reserve_a, reserve_b], [6, 6])
      .expect("model");
    let (i, j) = trade_direction.source_first(0, 1);
    let expected = model.sim_dy(i, j, amount).expect("dy");
    prop_assert!(
      out.destination_amount_swapped.abs_diff(expected) <= 1,
      "engine={} reference={}",
      out.destination_amount_swapped,
      expected
    );
  }

  #[test]
  fn stable_deposit_matches_reference(
    amp in 2..10_000u64,
    reserve_a in 1_000_000_000..1_000_000_000_000u128,
    reserve_b in 1_000_000_000..1_000_000_000_000u128,
    amount in 1..1_000_000_000u128,
  ) {
    let minted = CurveParameters::stable_swap(amp, 6, 6)
      .deposit_single_token_type(
        amount,
        reserve_a,
        reserve_b,
        SUPPLY,
        TradeDirection::AtoB,
      )
      .expect("deposit");
    let model = StableSwapModel::new_with_pool_tokens(
      amp,
      [reserve_a, reserve_b],
      [6, 6],
      SUPPLY,
    )
    .expect("model");
    let expected = model.sim_deposit_single(0, amount).expect("minted");
    prop_assert!(minted.abs_diff(expected) <= 1);
  }
}
