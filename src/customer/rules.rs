use std::sync::Arc;

use chrono::{Months, NaiveDate};
use once_cell::sync::OnceCell;
use tracing::info;
use verdict_rules::{Check, EngineConfig, FutureExt, RuleDefinition, RuleError, RuleRegistry};

use super::context::CustomerContext;
use super::services::{MembershipDirectory, TwoFactorGateway};

/// Category every customer rule is registered under.
pub const CUSTOMER: &str = "Customer";

pub const MUST_BE_18: &str = "must-be-18";
pub const MUST_LIVE_AT_ADDRESS_1_YEAR: &str = "must-live-at-current-address-1-year";
pub const MUST_HAVE_ACTIVE_MEMBERSHIP: &str = "must-have-active-membership";
pub const MUST_PASS_TWO_FACTOR: &str = "must-pass-two-factor";

static CUSTOMER_REGISTRY: OnceCell<RuleRegistry<CustomerContext>> = OnceCell::new();

/// Backends consulted by the asynchronous customer checks.
#[derive(Clone)]
pub struct CustomerServices {
    pub membership: Arc<dyn MembershipDirectory>,
    pub two_factor: Arc<dyn TwoFactorGateway>,
}

impl CustomerServices {
    /// Bundles the backends handed to [`customer_registry`].
    pub fn new(
        membership: Arc<dyn MembershipDirectory>,
        two_factor: Arc<dyn TwoFactorGateway>,
    ) -> Self {
        Self {
            membership,
            two_factor,
        }
    }
}

// `None` when the anniversary is not representable, which fails the check.
fn anniversary(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(years * 12))
}

/// Synchronous: date of birth is at least 18 years before `today`.
pub fn must_be_18() -> Result<RuleDefinition<CustomerContext>, RuleError> {
    RuleDefinition::builder(MUST_BE_18, CUSTOMER)
        .priority(1)
        .description("customer must be at least 18 years old")
        .check(Check::sync("age", |ctx: &CustomerContext| {
            anniversary(ctx.dob, 18).is_some_and(|adult| adult <= ctx.today)
        }))
        .build()
}

/// Synchronous: moved in at least a year before `today`. No address fails.
pub fn must_live_at_current_address_1_year() -> Result<RuleDefinition<CustomerContext>, RuleError>
{
    RuleDefinition::builder(MUST_LIVE_AT_ADDRESS_1_YEAR, CUSTOMER)
        .priority(2)
        .description("customer must have lived at the current address for a year")
        .check(Check::sync("address-tenure", |ctx: &CustomerContext| {
            ctx.address
                .as_ref()
                .and_then(|address| anniversary(address.moved_in, 1))
                .is_some_and(|settled| settled <= ctx.today)
        }))
        .build()
}

/// Asynchronous: asks the membership directory about `ctx.id`.
pub fn must_have_active_membership(
    directory: Arc<dyn MembershipDirectory>,
) -> Result<RuleDefinition<CustomerContext>, RuleError> {
    RuleDefinition::builder(MUST_HAVE_ACTIVE_MEMBERSHIP, CUSTOMER)
        .priority(3)
        .description("customer must hold an active membership")
        .check(Check::try_asynchronous(
            "membership",
            move |ctx: &CustomerContext| {
                let directory = Arc::clone(&directory);
                async move { directory.has_active_membership(&ctx.id).await }.boxed()
            },
        ))
        .build()
}

/// Asynchronous: asks the two-factor gateway about `ctx.id`.
pub fn must_pass_two_factor(
    gateway: Arc<dyn TwoFactorGateway>,
) -> Result<RuleDefinition<CustomerContext>, RuleError> {
    RuleDefinition::builder(MUST_PASS_TWO_FACTOR, CUSTOMER)
        .priority(4)
        .description("customer must have completed two-factor verification")
        .check(Check::try_asynchronous(
            "two-factor",
            move |ctx: &CustomerContext| {
                let gateway = Arc::clone(&gateway);
                async move { gateway.is_verified(&ctx.id).await }.boxed()
            },
        ))
        .build()
}

/// Builds the `Customer` registry. The membership rule is registered before
/// the two-factor rule so the asynchronous path consults the directory first.
pub fn customer_registry(
    services: &CustomerServices,
    config: &EngineConfig,
) -> Result<RuleRegistry<CustomerContext>, RuleError> {
    let mut builder = RuleRegistry::builder().with_ordering(config.rule_ordering);
    builder
        .register(must_be_18()?)?
        .register(must_live_at_current_address_1_year()?)?
        .register(must_have_active_membership(Arc::clone(&services.membership))?)?
        .register(must_pass_two_factor(Arc::clone(&services.two_factor))?)?;
    Ok(builder.build())
}

/// Populates the process-wide registry on first call; later calls return the
/// already installed registry and ignore their arguments.
pub fn init_customer_registry(
    services: &CustomerServices,
    config: &EngineConfig,
) -> Result<&'static RuleRegistry<CustomerContext>, RuleError> {
    CUSTOMER_REGISTRY.get_or_try_init(|| {
        let registry = customer_registry(services, config)?;
        info!(
            rules = registry.len(),
            ordering = %registry.ordering(),
            "customer registry installed"
        );
        Ok(registry)
    })
}

/// The process-wide registry, once [`init_customer_registry`] has run.
pub fn installed_customer_registry() -> Option<&'static RuleRegistry<CustomerContext>> {
    CUSTOMER_REGISTRY.get()
}
