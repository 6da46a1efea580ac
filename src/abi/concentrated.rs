//! Events emitted by concentrated-liquidity pools (Algebra/UniV3 layout)

use alloy_sol_types::sol;

sol! {
    /// Signed amounts: positive enters the pool, negative leaves to the trader
    event Swap(
        address indexed sender,
        address indexed recipient,
        int256 amount0,
        int256 amount1,
        uint160 sqrtPriceX96,
        uint128 liquidity,
        int24 tick
    );
}
