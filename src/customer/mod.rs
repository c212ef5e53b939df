//! Sample `Customer` rules: age and address tenure checks on the synchronous
//! path, membership and two-factor lookups on the asynchronous path.

mod context;
mod rules;
mod services;

pub use context::{CustomerAddress, CustomerContext};
pub use rules::{
    customer_registry, init_customer_registry, installed_customer_registry, must_be_18,
    must_have_active_membership, must_live_at_current_address_1_year, must_pass_two_factor,
    CustomerServices, CUSTOMER, MUST_BE_18, MUST_HAVE_ACTIVE_MEMBERSHIP,
    MUST_LIVE_AT_ADDRESS_1_YEAR, MUST_PASS_TWO_FACTOR,
};
pub use services::{
    InMemoryMembershipDirectory, InMemoryTwoFactorGateway, MembershipDirectory, ServiceError,
    TwoFactorGateway,
};
