//! Lobbyist-client / vendor name overlap detection.
//!
//! Flags pairs whose uppercase word sets share at least a threshold number
//! of tokens, e.g. "ACME CONSULTING LLC" and "ACME CONSULTING SERVICES INC".

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use ledger_core::models::{LobbyistRecord, VendorRecord};

// ── Overlap ───────────────────────────────────────────────────────────────────

/// A client and vendor whose names share enough tokens to suggest the same
/// entity.
///
/// Names that differ only in case count once; `client` and `vendor` carry
/// the lexicographically smallest spelling of each.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Overlap {
    pub client: String,
    pub vendor: String,
    pub shared_tokens: BTreeSet<String>,
}

impl Overlap {
    /// The same match with the roles exchanged.
    pub fn swapped(&self) -> Overlap {
        Overlap {
            client: self.vendor.clone(),
            vendor: self.client.clone(),
            shared_tokens: self.shared_tokens.clone(),
        }
    }
}

// ── Tokenising ────────────────────────────────────────────────────────────────

/// Uppercase whitespace-separated token set of `name`.
pub fn name_tokens(name: &str) -> BTreeSet<String> {
    name.split_whitespace().map(str::to_uppercase).collect()
}

/// Drop case-insensitive duplicates. Each group keeps its lexicographically
/// smallest spelling, so the survivor does not depend on input order.
fn dedup_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut canonical: BTreeMap<String, &'a str> = BTreeMap::new();
    for name in names {
        canonical
            .entry(name.to_uppercase())
            .and_modify(|kept| *kept = (*kept).min(name))
            .or_insert(name);
    }
    canonical.into_values().collect()
}

// ── Detection ─────────────────────────────────────────────────────────────────

/// Every (client, vendor) pair sharing at least `min_shared` tokens.
///
/// The result is a sorted set: it does not depend on the order of either
/// input, and `find_overlaps(a, b)` equals `find_overlaps(b, a)` with each
/// entry [`swapped`](Overlap::swapped). The vendor axis is scanned in
/// parallel and the partial results are merged by set union.
pub fn find_overlaps<'a, 'b>(
    clients: impl IntoIterator<Item = &'a str>,
    vendors: impl IntoIterator<Item = &'b str>,
    min_shared: usize,
) -> BTreeSet<Overlap> {
    let clients: Vec<(&str, BTreeSet<String>)> = dedup_names(clients)
        .into_iter()
        .map(|name| (name, name_tokens(name)))
        .collect();
    let vendors: Vec<(&str, BTreeSet<String>)> = dedup_names(vendors)
        .into_iter()
        .map(|name| (name, name_tokens(name)))
        .collect();

    let overlaps: BTreeSet<Overlap> = vendors
        .par_iter()
        .map(|(vendor, vendor_tokens)| {
            clients
                .iter()
                .filter_map(|(client, client_tokens)| {
                    let shared: BTreeSet<String> = client_tokens
                        .intersection(vendor_tokens)
                        .cloned()
                        .collect();
                    (shared.len() >= min_shared).then(|| Overlap {
                        client: client.to_string(),
                        vendor: vendor.to_string(),
                        shared_tokens: shared,
                    })
                })
                .collect::<BTreeSet<Overlap>>()
        })
        .reduce(BTreeSet::new, |mut acc, part| {
            acc.extend(part);
            acc
        });

    debug!(
        "find_overlaps: {} clients x {} vendors -> {} overlaps",
        clients.len(),
        vendors.len(),
        overlaps.len()
    );
    overlaps
}

/// [`find_overlaps`] over lobbyist clients and vendor names.
pub fn client_vendor_overlaps(
    lobbyists: &[LobbyistRecord],
    vendors: &[VendorRecord],
    min_shared: usize,
) -> Vec<Overlap> {
    find_overlaps(
        lobbyists.iter().map(|l| l.client.as_str()),
        vendors.iter().map(|v| v.vendor_name.as_str()),
        min_shared,
    )
    .into_iter()
    .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::settings::MIN_SHARED_TOKENS;

    fn tokens(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_name_tokens_uppercases_and_drops_empty() {
        assert_eq!(
            name_tokens("  Acme   consulting\tLLC "),
            tokens(&["ACME", "CONSULTING", "LLC"])
        );
        assert!(name_tokens("   ").is_empty());
    }

    #[test]
    fn test_shared_two_tokens_emits_overlap() {
        let found = find_overlaps(
            ["ACME CONSULTING LLC"],
            ["ACME CONSULTING SERVICES INC"],
            MIN_SHARED_TOKENS,
        );
        assert_eq!(found.len(), 1);
        let overlap = found.iter().next().unwrap();
        assert_eq!(overlap.client, "ACME CONSULTING LLC");
        assert_eq!(overlap.vendor, "ACME CONSULTING SERVICES INC");
        assert_eq!(overlap.shared_tokens, tokens(&["ACME", "CONSULTING"]));
    }

    #[test]
    fn test_single_shared_token_is_not_enough() {
        let found = find_overlaps(["ACME LLC"], ["ACME INC"], MIN_SHARED_TOKENS);
        assert!(found.is_empty());
    }

    #[test]
    fn test_duplicate_names_deduplicated_case_insensitively() {
        let found = find_overlaps(
            ["Gulf Coast Paving", "GULF COAST PAVING"],
            ["gulf coast paving co"],
            MIN_SHARED_TOKENS,
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found.iter().next().unwrap().client, "GULF COAST PAVING");
    }

    #[test]
    fn test_case_variant_order_does_not_change_result() {
        let vendors = ["Gulf Coast Paving Co", "gulf coast paving co"];
        let forward = find_overlaps(
            ["Gulf Coast Paving", "GULF COAST PAVING"],
            vendors,
            MIN_SHARED_TOKENS,
        );
        let reversed = find_overlaps(
            ["GULF COAST PAVING", "Gulf Coast Paving"],
            [vendors[1], vendors[0]],
            MIN_SHARED_TOKENS,
        );
        assert_eq!(forward, reversed);
        let overlap = forward.iter().next().unwrap();
        assert_eq!(overlap.vendor, "Gulf Coast Paving Co");
    }

    #[test]
    fn test_symmetric_under_swap() {
        let left = ["ACME CONSULTING LLC", "Blue Bayou Energy", "Harbor Legal Group"];
        let right = ["Acme Consulting Services", "Harbor Legal Group PLLC", "Civic IT"];

        let forward = find_overlaps(left, right, MIN_SHARED_TOKENS);
        let backward: BTreeSet<Overlap> = find_overlaps(right, left, MIN_SHARED_TOKENS)
            .iter()
            .map(Overlap::swapped)
            .collect();
        assert_eq!(forward, backward);
        assert_eq!(forward.len(), 2);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(find_overlaps(Vec::<&str>::new(), ["ACME INC"], 2).is_empty());
        assert!(find_overlaps(["ACME INC"], Vec::<&str>::new(), 2).is_empty());
    }

    #[test]
    fn test_client_vendor_overlaps_from_records() {
        let lobbyists = vec![LobbyistRecord {
            lobbyist_name: "Pat Smith".into(),
            client: "ACME CONSULTING LLC".into(),
            category: "Consulting".into(),
        }];
        let vendors = vec![VendorRecord {
            vendor_name: "ACME CONSULTING SERVICES INC".into(),
            category: "Consulting".into(),
            department: "Budget".into(),
        }];
        let found = client_vendor_overlaps(&lobbyists, &vendors, MIN_SHARED_TOKENS);
        assert_eq!(found.len(), 1);
    }
}
