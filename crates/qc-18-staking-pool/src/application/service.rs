//! # Staking Pool Service
//!
//! Single owner of the pool context. Every operation takes the pool lock for
//! its whole duration, including the synchronous outbound calls, so
//! operations are observed in one total order.
//!
//! ## Operation Flow
//!
//! 1. Lock the context
//! 2. Check gate, caller and amount
//! 3. Stage ledger and pool changes
//! 4. Call the payout sink or registration authority (if any)
//! 5. Commit, or drop the staged changes on failure
//! 6. Publish the event with the next sequence number

use crate::adapters::{InMemoryPayoutSink, InMemoryRegistrationAuthority, RecordingEventPublisher};
use crate::application::ensure_owner;
use crate::application::forwarder::CollateralForwarder;
use crate::config::{ConfigError, PoolConfig};
use crate::domain::entities::{CollateralRecord, PoolSnapshot};
use crate::domain::errors::StakingError;
use crate::domain::invariants::{check_all_invariants, InvariantViolation};
use crate::domain::transaction::PoolContext;
use crate::domain::value_objects::{AccountId, U256};
use crate::events::{EventEnvelope, PoolEvent};
use crate::ports::inbound::StakingPoolApi;
use crate::ports::outbound::{EventPublisher, PayoutSink, RegistrationAuthority};

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Statistics for the Staking Pool Service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Operations that committed.
    pub operations_committed: u64,
    /// Operations that failed and left the pool unchanged.
    pub operations_rejected: u64,
    /// Events handed to the publisher.
    pub events_published: u64,
}

/// Everything guarded by the pool lock.
#[derive(Debug)]
struct PoolCore {
    context: PoolContext,
    next_sequence: u64,
    stats: ServiceStats,
}

/// The main Staking Pool Service.
pub struct StakingPoolService<R, P, E>
where
    R: RegistrationAuthority,
    P: PayoutSink,
    E: EventPublisher,
{
    config: PoolConfig,
    admission_limit: U256,
    core: Mutex<PoolCore>,
    forwarder: CollateralForwarder<R>,
    payout: Arc<P>,
    publisher: Arc<E>,
}

impl<R, P, E> StakingPoolService<R, P, E>
where
    R: RegistrationAuthority,
    P: PayoutSink,
    E: EventPublisher,
{
    /// Create a service for a fresh pool.
    pub fn new(
        config: PoolConfig,
        authority: Arc<R>,
        payout: Arc<P>,
        publisher: Arc<E>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let admission_limit = config.admission_limit()?;

        info!(
            owner = %config.owner,
            capacity = %config.capacity,
            margin = %config.capacity_margin,
            "Staking pool created"
        );

        Ok(Self {
            core: Mutex::new(PoolCore {
                context: PoolContext::new(config.owner),
                next_sequence: 0,
                stats: ServiceStats::default(),
            }),
            forwarder: CollateralForwarder::new(authority, config.forward_amount),
            admission_limit,
            config,
            payout,
            publisher,
        })
    }

    /// Service configuration.
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Capacity plus margin.
    #[must_use]
    pub fn admission_limit(&self) -> U256 {
        self.admission_limit
    }

    /// The registration authority adapter.
    #[must_use]
    pub fn authority(&self) -> &Arc<R> {
        self.forwarder.authority()
    }

    /// The payout adapter.
    #[must_use]
    pub fn payout(&self) -> &Arc<P> {
        &self.payout
    }

    /// The event publisher.
    #[must_use]
    pub fn publisher(&self) -> &Arc<E> {
        &self.publisher
    }

    /// Current service statistics.
    #[must_use]
    pub fn stats(&self) -> ServiceStats {
        self.core.lock().stats.clone()
    }

    /// Check every pool invariant against the committed state.
    #[must_use]
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        self.read(|ctx| check_all_invariants(ctx, self.admission_limit))
    }

    /// Run `f` under the pool lock; publish its event if it commits.
    fn transact<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut PoolContext) -> Result<(T, PoolEvent), StakingError>,
    ) -> Result<T, StakingError> {
        let mut guard = self.core.lock();
        let core = &mut *guard;

        match f(&mut core.context) {
            Ok((value, event)) => {
                core.stats.operations_committed += 1;
                core.next_sequence += 1;
                let sequence = core.next_sequence;

                info!(operation, sequence, event = event.name(), "Operation committed");

                self.publisher.publish(EventEnvelope::new(sequence, event));
                core.stats.events_published += 1;
                Ok(value)
            }
            Err(e) => {
                core.stats.operations_rejected += 1;
                debug!(operation, error = %e, "Operation rejected");
                Err(e)
            }
        }
    }

    fn read<T>(&self, f: impl FnOnce(&PoolContext) -> T) -> T {
        f(&self.core.lock().context)
    }

    fn pay(&self, to: AccountId, amount: U256) -> Result<(), StakingError> {
        self.payout.transfer(to, amount).map_err(|e| {
            error!(to = %to, amount = %amount, error = %e, "Payout failed");
            StakingError::from(e)
        })
    }
}

impl<R, P, E> StakingPoolApi for StakingPoolService<R, P, E>
where
    R: RegistrationAuthority,
    P: PayoutSink,
    E: EventPublisher,
{
    #[instrument(skip(self))]
    fn stake(&self, caller: AccountId, amount: U256) -> Result<(), StakingError> {
        let limit = self.admission_limit;

        self.transact("stake", |ctx| {
            let changes = {
                let mut tx = ctx.begin();
                tx.state().gate.ensure_admission_open()?;
                if amount.is_zero() {
                    return Err(StakingError::InvalidAmount);
                }

                let requested = tx
                    .total_eth_staked()
                    .checked_add(amount)
                    .ok_or(StakingError::ArithmeticOverflow)?;
                if requested > limit {
                    return Err(StakingError::CapacityExceeded { requested, limit });
                }

                tx.credit_stake(caller, amount)?;
                tx.receive_funds(amount)?;
                tx.into_changes()
            };
            ctx.commit(changes);

            Ok((
                (),
                PoolEvent::Stake {
                    account: caller,
                    amount,
                },
            ))
        })
    }

    #[instrument(skip(self))]
    fn withdraw(&self, caller: AccountId, amount: U256) -> Result<(), StakingError> {
        self.transact("withdraw", |ctx| {
            let changes = {
                let mut tx = ctx.begin();
                tx.state().gate.ensure_admission_open()?;
                if amount.is_zero() {
                    return Err(StakingError::InvalidAmount);
                }

                tx.debit_stake(caller, amount)?;
                let held = tx.state().pool_balance;
                tx.release_funds(
                    amount,
                    StakingError::PayoutFailed(format!(
                        "pool holds {held}, cannot pay {amount}"
                    )),
                )?;
                tx.into_changes()
            };

            self.pay(caller, amount)?;
            ctx.commit(changes);

            Ok((
                (),
                PoolEvent::WithdrawStake {
                    account: caller,
                    amount,
                },
            ))
        })
    }

    #[instrument(skip(self))]
    fn claim(&self, caller: AccountId, amount: U256) -> Result<U256, StakingError> {
        self.transact("claim", |ctx| {
            let (changes, quote) = {
                ctx.state().gate.ensure_claimable()?;
                let quote = ctx.accountant().quote_claim(&caller, amount)?;

                let mut tx = ctx.begin();
                tx.debit_claim(caller, amount)?;
                let held = tx.state().pool_balance;
                tx.release_funds(
                    quote.payout,
                    StakingError::PayoutFailed(format!(
                        "pool holds {held}, cannot pay {}",
                        quote.payout
                    )),
                )?;
                (tx.into_changes(), quote)
            };

            self.pay(caller, quote.payout)?;
            ctx.commit(changes);

            debug!(
                principal = %quote.principal,
                rewards = %quote.rewards,
                "Claim paid"
            );

            Ok((
                quote.rewards,
                PoolEvent::ClaimRewards {
                    account: caller,
                    amount,
                    rewards: quote.rewards,
                },
            ))
        })
    }

    #[instrument(skip(self))]
    fn receive_rewards(&self, from: AccountId, amount: U256) -> Result<(), StakingError> {
        self.transact("receive_rewards", |ctx| {
            let changes = {
                let mut tx = ctx.begin();
                let state = tx.state_mut();
                state.total_rewards_received = state
                    .total_rewards_received
                    .checked_add(amount)
                    .ok_or(StakingError::ArithmeticOverflow)?;
                tx.receive_funds(amount)?;
                tx.into_changes()
            };
            ctx.commit(changes);

            Ok(((), PoolEvent::RewardsReceived { from, amount }))
        })
    }

    fn stake_of(&self, account: &AccountId) -> U256 {
        self.read(|ctx| ctx.ledger().get(account))
    }

    fn reward_of(&self, account: &AccountId) -> Result<U256, StakingError> {
        self.read(|ctx| ctx.accountant().reward_of(account))
    }

    fn share_of(&self, account: &AccountId) -> Result<U256, StakingError> {
        self.read(|ctx| ctx.accountant().share_of(account))
    }

    fn total_staked(&self) -> U256 {
        self.read(|ctx| ctx.ledger().total_eth_staked())
    }

    fn total_rewards_received(&self) -> U256 {
        self.read(|ctx| ctx.state().total_rewards_received)
    }

    fn pool_balance(&self) -> U256 {
        self.read(|ctx| ctx.state().pool_balance)
    }

    fn snapshot(&self) -> PoolSnapshot {
        self.read(PoolContext::snapshot)
    }

    #[instrument(skip(self))]
    fn pause(&self, caller: AccountId) -> Result<(), StakingError> {
        self.transact("pause", |ctx| {
            ensure_owner(ctx.state(), &caller, "pause")?;
            let changes = {
                let mut tx = ctx.begin();
                tx.state_mut().gate.pause()?;
                tx.into_changes()
            };
            ctx.commit(changes);
            Ok(((), PoolEvent::Paused { by: caller }))
        })
    }

    #[instrument(skip(self))]
    fn unpause(&self, caller: AccountId) -> Result<(), StakingError> {
        self.transact("unpause", |ctx| {
            ensure_owner(ctx.state(), &caller, "unpause")?;
            let changes = {
                let mut tx = ctx.begin();
                tx.state_mut().gate.unpause()?;
                tx.into_changes()
            };
            ctx.commit(changes);
            Ok(((), PoolEvent::Unpaused { by: caller }))
        })
    }

    #[instrument(skip(self))]
    fn turn_on_rewards(&self, caller: AccountId) -> Result<(), StakingError> {
        self.transact("turn_on_rewards", |ctx| {
            ensure_owner(ctx.state(), &caller, "turn_on_rewards")?;
            let changes = {
                let mut tx = ctx.begin();
                tx.state_mut().gate.turn_on_rewards();
                tx.into_changes()
            };
            ctx.commit(changes);
            Ok(((), PoolEvent::RewardsEnabled))
        })
    }

    #[instrument(skip(self))]
    fn turn_off_pool_full(&self, caller: AccountId) -> Result<(), StakingError> {
        self.transact("turn_off_pool_full", |ctx| {
            ensure_owner(ctx.state(), &caller, "turn_off_pool_full")?;
            let changes = {
                let mut tx = ctx.begin();
                tx.state_mut().gate.turn_off_pool_full()?;
                tx.into_changes()
            };
            ctx.commit(changes);
            Ok(((), PoolEvent::PoolReopened))
        })
    }

    #[instrument(skip(self, record))]
    fn forward(&self, caller: AccountId, record: CollateralRecord) -> Result<(), StakingError> {
        self.transact("forward", |ctx| {
            self.forwarder.forward(ctx, &caller, &record)?;
            Ok((
                (),
                PoolEvent::CollateralForwarded {
                    amount: self.forwarder.forward_amount(),
                    integrity_root: record.integrity_root,
                },
            ))
        })
    }

    #[instrument(skip(self))]
    fn transfer_ownership(
        &self,
        caller: AccountId,
        new_owner: AccountId,
    ) -> Result<(), StakingError> {
        self.transact("transfer_ownership", |ctx| {
            ensure_owner(ctx.state(), &caller, "transfer_ownership")?;
            let changes = {
                let mut tx = ctx.begin();
                tx.state_mut().owner = new_owner;
                tx.into_changes()
            };
            ctx.commit(changes);
            Ok((
                (),
                PoolEvent::OwnershipTransferred {
                    previous: caller,
                    new: new_owner,
                },
            ))
        })
    }
}

/// Service wired to the in-memory adapters.
pub type TestService =
    StakingPoolService<InMemoryRegistrationAuthority, InMemoryPayoutSink, RecordingEventPublisher>;

/// Create a service with default configuration and in-memory adapters.
///
/// Fails with `MissingOwner` for the zero account.
pub fn create_test_service(owner: AccountId) -> Result<TestService, ConfigError> {
    StakingPoolService::new(
        PoolConfig::with_owner(owner),
        Arc::new(InMemoryRegistrationAuthority::new()),
        Arc::new(InMemoryPayoutSink::new()),
        Arc::new(RecordingEventPublisher::new()),
    )
}

// =============================================================================
// TESTS
// =============================================================================
