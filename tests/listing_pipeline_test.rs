//! Fetch -> normalize -> filter/sort -> paginate, end to end over stub data

mod common;

use common::{apt, listing, marketplace, resource_json, InvokeOutcome, StubChain, StubInvoker};
use nftmart::app::App;
use nftmart::domain::{paginate, ListingQuery, Rarity, SortOrder, PAGE_SIZE};

fn scenario_listings() -> Vec<nftmart::domain::Listing> {
    let rarities = [1, 1, 2, 3, 4, 4, 4, 2, 1, 3];
    let prices = [1, 5, 2, 8, 3, 9, 4, 7, 6, 10];
    rarities
        .iter()
        .zip(prices.iter())
        .enumerate()
        .map(|(i, (r, p))| listing(i as u64 + 1, *p, *r))
        .collect()
}

#[test]
fn test_super_rare_ascending_scenario() {
    let query = ListingQuery {
        rarity: Some(Rarity::SuperRare),
        sort: SortOrder::PriceAsc,
        ..ListingQuery::default()
    };
    let result = query.apply(&scenario_listings());
    let prices: Vec<_> = result.iter().map(|l| l.price).collect();
    assert_eq!(prices, vec![apt(3), apt(4), apt(9)]);
}

#[test]
fn test_descending_is_monotone_and_bounded() {
    let query = ListingQuery {
        price_from: Some(apt(2)),
        price_to: Some(apt(8)),
        sort: SortOrder::PriceDesc,
        ..ListingQuery::default()
    };
    let result = query.apply(&scenario_listings());
    assert!(result.windows(2).all(|w| w[0].price >= w[1].price));
    assert!(result.iter().all(|l| l.price >= apt(2) && l.price <= apt(8)));
    assert_eq!(result.len(), 7);
}

#[test]
fn test_pagination_of_pipeline_output() {
    let all = ListingQuery::default().apply(&scenario_listings());
    assert_eq!(paginate(&all, 1).len(), PAGE_SIZE);
    assert_eq!(paginate(&all, 2).len(), 2);
    assert!(paginate(&all, 3).is_empty());
}

#[tokio::test]
async fn test_fetch_drops_unlisted_and_decodes() {
    let chain = StubChain::serving(resource_json(&[
        (1, 4, 1, true),
        (2, 1, 2, false),
        (3, 2, 4, true),
    ]));
    let market = marketplace(chain, StubInvoker::new(None, InvokeOutcome::Confirm));

    let fetched = market.fetch_listings().await.unwrap();
    assert_eq!(fetched.len(), 3);
    assert_eq!(fetched[0].name, "NFT #1");
    assert_eq!(fetched[0].uri, "ipfs://nft/1");

    let mut app = App::new();
    app.apply_listings(fetched);
    let ids: Vec<u64> = app.listings.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![3, 1]);
    assert!(app.listings.iter().all(|l| l.for_sale));
}

#[tokio::test]
async fn test_fetch_failure_leaves_listings() {
    let chain = StubChain::serving(resource_json(&[(1, 4, 1, true)]));
    let market = marketplace(chain.clone(), StubInvoker::new(None, InvokeOutcome::Confirm));

    let mut app = App::new();
    app.apply_listings(market.fetch_listings().await.unwrap());

    chain.set(None);
    let err = market.fetch_listings().await.unwrap_err();
    app.apply_fetch_failed(err.to_string());

    assert_eq!(app.listings.len(), 1);
    assert_eq!(app.status_text().map(|s| s.0), Some("Failed to fetch NFTs."));
}
