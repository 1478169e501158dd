use alloy_sol_types::sol;

sol! {
    /// Emitted by a bot contract after each swap it executes
    /// Note: pnl is signed and denominated in the bot's quote token
    #[derive(Debug)]
    event TradeExecuted(
        address indexed tokenIn,
        address indexed tokenOut,
        uint256 amountIn,
        uint256 amountOut,
        int256 pnl
    );
}
