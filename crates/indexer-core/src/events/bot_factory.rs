use alloy_sol_types::sol;

sol! {
    /// Emitted by the factory when a new bot contract is minted to its owner
    #[derive(Debug)]
    event BotDeployed(
        uint256 indexed tokenId,
        address indexed botAddress,
        address indexed owner
    );
}
