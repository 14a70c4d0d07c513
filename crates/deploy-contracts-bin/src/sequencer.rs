//! Deploys the token, then the market trading it, then makes the market a
//! minter of the token.
//!
//! Every step waits for the previous one. Nothing is retried or rolled back:
//! when the market deployment or the minter grant fails the token stays
//! deployed without a market, which is why every finished step is logged with
//! its address and transaction hash.

use {
    crate::deployer::{Deployed, Deployer, GrantStatus, MinterConfirmation, MinterGrant},
    alloy::primitives::Bytes,
    anyhow::{Context, Result, ensure},
    contracts::Contracts,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub token: Deployed,
    pub market: Deployed,
    pub minter_grant: MinterGrant,
}

pub async fn run(
    deployer: &dyn Deployer,
    contracts: &Contracts,
    minter_confirmation: MinterConfirmation,
) -> Result<Deployment> {
    let token_name = contracts.token.artifact().name();
    let market_name = contracts.market.artifact().name();

    let token = deployer
        .deploy(contracts.token.artifact(), Bytes::new())
        .await
        .with_context(|| format!("failed to deploy token contract {token_name}"))?;
    ensure!(
        !token.address.is_zero(),
        "token contract {token_name} was deployed to the zero address"
    );
    tracing::info!(
        contract = token_name,
        address = ?token.address,
        tx = ?token.transaction_hash,
        "deployed token"
    );

    let market = deployer
        .deploy(
            contracts.market.artifact(),
            contracts.market.constructor_args(token.address),
        )
        .await
        .with_context(|| {
            format!(
                "failed to deploy market contract {market_name} for token {token_name} at {:?}",
                token.address
            )
        })?;
    ensure!(
        !market.address.is_zero(),
        "market contract {market_name} was deployed to the zero address"
    );
    ensure!(
        market.address != token.address,
        "market contract {market_name} was deployed to the token address {:?}",
        token.address
    );
    tracing::info!(
        contract = market_name,
        address = ?market.address,
        tx = ?market.transaction_hash,
        "deployed market"
    );

    let minter_grant = deployer
        .add_minter(token.address, market.address, minter_confirmation)
        .await
        .with_context(|| {
            format!(
                "failed to make market {:?} a minter of token {:?}",
                market.address, token.address
            )
        })?;
    match minter_grant.status {
        GrantStatus::Submitted => tracing::warn!(
            tx = ?minter_grant.transaction_hash,
            "minter grant submitted without waiting for it to be mined"
        ),
        GrantStatus::Mined if contracts.token.exposes_is_minter() => {
            let granted = deployer
                .is_minter(token.address, market.address)
                .await
                .context("failed to verify the minter role")?;
            ensure!(
                granted,
                "market {:?} is not a minter of token {:?} after a successful addMinter",
                market.address,
                token.address
            );
            tracing::info!(tx = ?minter_grant.transaction_hash, "granted minter role");
        }
        GrantStatus::Mined => tracing::info!(
            tx = ?minter_grant.transaction_hash,
            "granted minter role, token does not expose isMinter to verify it"
        ),
    }

    Ok(Deployment {
        token,
        market,
        minter_grant,
    })
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::deployer::MockDeployer,
        alloy::primitives::{Address, B256, address},
        anyhow::anyhow,
        contracts::test_util,
        mockall::{Sequence, predicate::eq},
    };

    const TOKEN: Address = address!("0x0000000000000000000000000000000000000aaa");
    const MARKET: Address = address!("0x0000000000000000000000000000000000000bbb");
    const TOKEN_TX: B256 = B256::repeat_byte(1);
    const MARKET_TX: B256 = B256::repeat_byte(2);
    const GRANT_TX: B256 = B256::repeat_byte(3);

    fn token_args() -> Bytes {
        Bytes::new()
    }

    fn market_args() -> Bytes {
        test_util::market().constructor_args(TOKEN)
    }

    fn expect_token_deployment(deployer: &mut MockDeployer, seq: &mut Sequence) {
        deployer
            .expect_deploy()
            .times(1)
            .withf(|artifact, args| artifact.name() == "Mercury" && args[..] == token_args()[..])
            .returning(|_, _| {
                Ok(Deployed {
                    address: TOKEN,
                    transaction_hash: TOKEN_TX,
                })
            })
            .in_sequence(seq);
    }

    fn expect_market_deployment(deployer: &mut MockDeployer, seq: &mut Sequence) {
        deployer
            .expect_deploy()
            .times(1)
            .withf(|artifact, args| artifact.name() == "Market" && args[..] == market_args()[..])
            .returning(|_, _| {
                Ok(Deployed {
                    address: MARKET,
                    transaction_hash: MARKET_TX,
                })
            })
            .in_sequence(seq);
    }

    #[tokio::test]
    async fn deploys_token_then_market_then_grants_minter() {
        let mut deployer = MockDeployer::new();
        let mut seq = Sequence::new();
        expect_token_deployment(&mut deployer, &mut seq);
        expect_market_deployment(&mut deployer, &mut seq);
        deployer
            .expect_add_minter()
            .times(1)
            .with(eq(TOKEN), eq(MARKET), eq(MinterConfirmation::Receipt))
            .returning(|_, _, _| {
                Ok(MinterGrant {
                    transaction_hash: GRANT_TX,
                    status: GrantStatus::Mined,
                })
            })
            .in_sequence(&mut seq);
        deployer
            .expect_is_minter()
            .times(1)
            .with(eq(TOKEN), eq(MARKET))
            .returning(|_, _| Ok(true))
            .in_sequence(&mut seq);

        let deployment = run(
            &deployer,
            &test_util::contracts(),
            MinterConfirmation::Receipt,
        )
        .await
        .unwrap();

        assert_eq!(
            deployment,
            Deployment {
                token: Deployed {
                    address: TOKEN,
                    transaction_hash: TOKEN_TX,
                },
                market: Deployed {
                    address: MARKET,
                    transaction_hash: MARKET_TX,
                },
                minter_grant: MinterGrant {
                    transaction_hash: GRANT_TX,
                    status: GrantStatus::Mined,
                },
            }
        );
    }

    #[tokio::test]
    async fn token_failure_stops_the_sequence() {
        let mut deployer = MockDeployer::new();
        deployer
            .expect_deploy()
            .times(1)
            .returning(|_, _| Err(anyhow!("insufficient funds for gas")));
        deployer.expect_add_minter().never();
        deployer.expect_is_minter().never();

        let err = run(
            &deployer,
            &test_util::contracts(),
            MinterConfirmation::Receipt,
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "failed to deploy token contract Mercury");
        assert_eq!(err.root_cause().to_string(), "insufficient funds for gas");
    }

    #[tokio::test]
    async fn market_failure_skips_minter_grant() {
        let mut deployer = MockDeployer::new();
        let mut seq = Sequence::new();
        expect_token_deployment(&mut deployer, &mut seq);
        deployer
            .expect_deploy()
            .times(1)
            .returning(|_, _| Err(anyhow!("execution reverted")))
            .in_sequence(&mut seq);
        deployer.expect_add_minter().never();
        deployer.expect_is_minter().never();

        let err = run(
            &deployer,
            &test_util::contracts(),
            MinterConfirmation::Receipt,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().starts_with("failed to deploy market contract Market"));
    }

    #[tokio::test]
    async fn submitted_grant_is_not_verified() {
        let mut deployer = MockDeployer::new();
        let mut seq = Sequence::new();
        expect_token_deployment(&mut deployer, &mut seq);
        expect_market_deployment(&mut deployer, &mut seq);
        deployer
            .expect_add_minter()
            .times(1)
            .with(eq(TOKEN), eq(MARKET), eq(MinterConfirmation::Submitted))
            .returning(|_, _, _| {
                Ok(MinterGrant {
                    transaction_hash: GRANT_TX,
                    status: GrantStatus::Submitted,
                })
            })
            .in_sequence(&mut seq);
        deployer.expect_is_minter().never();

        let deployment = run(
            &deployer,
            &test_util::contracts(),
            MinterConfirmation::Submitted,
        )
        .await
        .unwrap();

        assert_eq!(deployment.minter_grant.status, GrantStatus::Submitted);
    }

    #[tokio::test]
    async fn grant_is_not_verified_without_is_minter() {
        let mut deployer = MockDeployer::new();
        let mut seq = Sequence::new();
        expect_token_deployment(&mut deployer, &mut seq);
        expect_market_deployment(&mut deployer, &mut seq);
        deployer
            .expect_add_minter()
            .times(1)
            .returning(|_, _, _| {
                Ok(MinterGrant {
                    transaction_hash: GRANT_TX,
                    status: GrantStatus::Mined,
                })
            })
            .in_sequence(&mut seq);
        deployer.expect_is_minter().never();
        let contracts = Contracts {
            token: test_util::token_without_is_minter("Mercury"),
            market: test_util::market(),
        };

        let deployment = run(&deployer, &contracts, MinterConfirmation::Receipt)
            .await
            .unwrap();

        assert_eq!(deployment.minter_grant.status, GrantStatus::Mined);
    }

    #[tokio::test]
    async fn missing_minter_role_fails() {
        let mut deployer = MockDeployer::new();
        let mut seq = Sequence::new();
        expect_token_deployment(&mut deployer, &mut seq);
        expect_market_deployment(&mut deployer, &mut seq);
        deployer.expect_add_minter().times(1).returning(|_, _, _| {
            Ok(MinterGrant {
                transaction_hash: GRANT_TX,
                status: GrantStatus::Mined,
            })
        });
        deployer
            .expect_is_minter()
            .times(1)
            .returning(|_, _| Ok(false));

        let err = run(
            &deployer,
            &test_util::contracts(),
            MinterConfirmation::Receipt,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("is not a minter of token"));
    }

    #[tokio::test]
    async fn zero_token_address_fails_before_market() {
        let mut deployer = MockDeployer::new();
        deployer.expect_deploy().times(1).returning(|_, _| {
            Ok(Deployed {
                address: Address::ZERO,
                transaction_hash: TOKEN_TX,
            })
        });
        deployer.expect_add_minter().never();

        let err = run(
            &deployer,
            &test_util::contracts(),
            MinterConfirmation::Receipt,
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "token contract Mercury was deployed to the zero address"
        );
    }

    #[tokio::test]
    async fn market_at_token_address_fails_before_grant() {
        let mut deployer = MockDeployer::new();
        deployer.expect_deploy().times(2).returning(|_, _| {
            Ok(Deployed {
                address: TOKEN,
                transaction_hash: TOKEN_TX,
            })
        });
        deployer.expect_add_minter().never();

        let err = run(
            &deployer,
            &test_util::contracts(),
            MinterConfirmation::Receipt,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("was deployed to the token address"));
    }
}
