// Only the role management part of the token is bound here. Everything
// else about the token and the market is opaque to the deployment tooling
// and gets deployed from the compiled artifacts.
alloy::sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface MinterRole {
        function addMinter(address account) external;
        function isMinter(address account) external view returns (bool);
    }
}
