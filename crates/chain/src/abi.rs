use alloy::sol;

// ─── Token Factories ────────────────────────────────────────────────────────
// Each factory emits its own `TokenCreated` shape. The liquidity-gen pair and
// the buyback-baby pair share a topic, so the emitting address decides the type.

sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    contract StandardTokenFactory {
        event TokenCreated(
            address indexed creator,
            address indexed tokenAddress,
            string name,
            string symbol,
            uint256 initialSupply,
            uint256 fee,
            uint256 timestamp
        );
    }
}

sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    contract AntiBotTokenFactory {
        event TokenCreated(
            address indexed token,
            address indexed creator,
            string name,
            string symbol,
            uint256 totalSupply
        );
    }
}

sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    contract LiquidityGenTokenFactory {
        event TokenCreated(
            address indexed token,
            address indexed creator,
            string name,
            string symbol,
            uint256 totalSupply,
            uint256 reflectionFee,
            uint256 liquidityFee,
            uint256 charityFee
        );
    }
}

sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    contract BuybackBabyTokenFactory {
        event TokenCreated(
            address indexed token,
            address indexed creator,
            string name,
            string symbol,
            uint256 totalSupply,
            address rewardToken
        );
    }
}

// ─── Liquidity Locker ───────────────────────────────────────────────────────
sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    contract LiquidityLocker {
        event ERC20Locked(
            uint256 indexed lockId,
            address indexed token,
            address indexed owner,
            uint256 amount,
            uint256 unlockTime
        );
        event ERC20Withdrawn(
            uint256 indexed lockId,
            address indexed token,
            address indexed owner,
            uint256 amount
        );
    }
}

// ─── Multisender ────────────────────────────────────────────────────────────
sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    contract Multisender {
        event NativeMultisend(
            address indexed sender,
            uint256 totalAmount,
            uint256 recipientCount,
            uint256 feeCharged
        );
        event ERC20Multisend(
            address indexed sender,
            address indexed token,
            uint256 totalAmount,
            uint256 recipientCount,
            uint256 feeCharged
        );
    }
}
