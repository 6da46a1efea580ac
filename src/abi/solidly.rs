//! Events emitted by classic Solidly-style pairs and their bribe contracts

use alloy_sol_types::sol;

sol! {
    /// Volatile/stable pair swap: unsigned legs, in and out per token
    event Swap(
        address indexed sender,
        address indexed to,
        uint256 amount0In,
        uint256 amount1In,
        uint256 amount0Out,
        uint256 amount1Out
    );

    /// Equalizer bribe deposit, filterable by reward token
    event DepositBribe(address indexed token, address indexed briber, uint256 amount);

    /// Velodrome/Aerodrome bribe notification; reward token is the second topic
    event NotifyReward(address indexed from, address indexed reward, uint256 epoch, uint256 amount);

    /// Thena bribe accrual, filterable by reward token
    event RewardAdded(address indexed rewardToken, uint256 reward, uint256 startTimestamp);
}
