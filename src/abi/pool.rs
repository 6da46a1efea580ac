//! Call interfaces for pairs, gauges and the voting stack

use alloy_sol_types::sol;

sol! {
    interface IPoolPair {
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
        function token0() external view returns (address);
        function token1() external view returns (address);
    }

    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function decimals() external view returns (uint8);
    }

    /// Aerodrome-style gauge: one reward token, no argument
    interface IGauge {
        function rewardRate() external view returns (uint256);
    }

    /// Equalizer-style gauge: reward rate per reward token
    interface IMultiRewardGauge {
        function rewardRate(address token) external view returns (uint256);
    }

    interface IPoolFactory {
        function getFee(address pool, bool stable) external view returns (uint256);
    }

    /// Ichi-style vault carrying its own fee in 1e-4 units
    interface IVault {
        function fee() external view returns (uint256);
    }

    interface IVoter {
        function votes(uint256 tokenId, address pool) external view returns (uint256);
        function weights(address pool) external view returns (uint256);
        function epochVoteStart(uint256 timestamp) external view returns (uint256);
        function epochVoteEnd(uint256 timestamp) external view returns (uint256);
    }

    interface IVotingEscrow {
        function balanceOfNFT(uint256 tokenId) external view returns (uint256);
    }
}
