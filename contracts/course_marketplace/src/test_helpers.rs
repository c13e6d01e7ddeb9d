extern crate std;

use soroban_sdk::{testutils::Address as _, token, Address, Env};

use crate::{CourseMarketplace, CourseMarketplaceClient};

/// Deploy the marketplace against a fresh Stellar asset, with every auth mocked.
pub fn setup() -> (Env, CourseMarketplaceClient<'static>, Address, token::Client<'static>) {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let token = create_token(&env, &admin);
    let contract_id = env.register(CourseMarketplace, (admin.clone(), token.address.clone()));
    let client = CourseMarketplaceClient::new(&env, &contract_id);
    (env, client, admin, token)
}

fn create_token<'a>(env: &Env, admin: &Address) -> token::Client<'a> {
    let addr = env.register_stellar_asset_contract_v2(admin.clone());
    token::Client::new(env, &addr.address())
}

pub fn mint(env: &Env, token: &token::Client, to: &Address, amount: i128) {
    token::StellarAssetClient::new(env, &token.address).mint(to, &amount);
}

pub fn approve(env: &Env, token: &token::Client, from: &Address, spender: &Address, amount: i128) {
    let expiration = env.ledger().sequence() + 1_000;
    token.approve(from, spender, &amount, &expiration);
}
