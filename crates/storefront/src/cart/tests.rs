//! Cart service tests over in-memory fake stores.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use cybee_core::{LineItem, ProductId, UserId};
use cybee_firebase::FirebaseError;

use super::*;

/// In-memory guest store. `None` models an absent session key.
#[derive(Default)]
struct FakeGuestStore {
    items: Mutex<Option<Vec<LineItem>>>,
}

impl FakeGuestStore {
    fn with_items(items: Vec<LineItem>) -> Self {
        Self {
            items: Mutex::new(Some(items)),
        }
    }

    fn snapshot(&self) -> Option<Vec<LineItem>> {
        self.items.lock().expect("lock").clone()
    }
}

impl GuestCartStore for &FakeGuestStore {
    async fn load(&self) -> Result<Vec<LineItem>, CartError> {
        Ok(self.items.lock().expect("lock").clone().unwrap_or_default())
    }

    async fn store(&self, items: &[LineItem]) -> Result<(), CartError> {
        *self.items.lock().expect("lock") = Some(items.to_vec());
        Ok(())
    }

    async fn clear(&self) -> Result<(), CartError> {
        *self.items.lock().expect("lock") = None;
        Ok(())
    }
}

/// In-memory user store with injectable write/read failures.
#[derive(Default)]
struct FakeUserStore {
    carts: Mutex<HashMap<UserId, Vec<LineItem>>>,
    fail_writes: AtomicBool,
    /// When set, writes succeed but are dropped, so verification re-reads
    /// see stale data.
    drop_writes: AtomicBool,
}

impl FakeUserStore {
    fn with_cart(user: &UserId, items: Vec<LineItem>) -> Self {
        let store = Self::default();
        store
            .carts
            .lock()
            .expect("lock")
            .insert(user.clone(), items);
        store
    }

    fn snapshot(&self, user: &UserId) -> Option<Vec<LineItem>> {
        self.carts.lock().expect("lock").get(user).cloned()
    }
}

fn unavailable() -> CartError {
    CartError::Remote(FirebaseError::Status {
        status: 503,
        message: "backend unavailable".to_owned(),
    })
}

impl UserCartStore for &FakeUserStore {
    async fn load(&self, user: &UserId) -> Result<Vec<LineItem>, CartError> {
        Ok(self
            .carts
            .lock()
            .expect("lock")
            .get(user)
            .cloned()
            .unwrap_or_default())
    }

    async fn store(&self, user: &UserId, items: &[LineItem]) -> Result<(), CartError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        if self.drop_writes.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.carts
            .lock()
            .expect("lock")
            .insert(user.clone(), items.to_vec());
        Ok(())
    }
}

fn item(id: &str, quantity: u32) -> LineItem {
    LineItem {
        id: ProductId::new(id),
        name: id.to_uppercase(),
        price: "10.00".parse().expect("valid decimal"),
        image: None,
        quantity,
    }
}

fn uid() -> UserId {
    UserId::new("user-1")
}

fn guest_service<'a>(
    guest: &'a FakeGuestStore,
    users: &'a FakeUserStore,
) -> CartService<&'a FakeGuestStore, &'a FakeUserStore> {
    CartService::new(guest, users, None)
}

// ============================================================================
// Basic operations
// ============================================================================

#[tokio::test]
async fn test_re_add_accumulates_quantity() {
    let guest = FakeGuestStore::default();
    let users = FakeUserStore::default();
    let service = guest_service(&guest, &users);

    service.add(item("p1", 1)).await.expect("add");
    service.add(item("p1", 1)).await.expect("add");

    let cart = service.get().await;
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.first().map(|i| i.quantity), Some(2));
}

#[tokio::test]
async fn test_add_ignores_incoming_quantity() {
    let guest = FakeGuestStore::default();
    let users = FakeUserStore::default();
    let service = guest_service(&guest, &users);

    // A product card submitting a stale quantity still adds exactly one.
    service.add(item("p1", 7)).await.expect("add");

    assert_eq!(service.item_count().await, 1);
}

#[tokio::test]
async fn test_set_quantity_zero_or_negative_removes() {
    let guest = FakeGuestStore::with_items(vec![item("p1", 3), item("p2", 1)]);
    let users = FakeUserStore::default();
    let service = guest_service(&guest, &users);

    service
        .set_quantity(&ProductId::new("p1"), 0)
        .await
        .expect("set");
    assert_eq!(service.get().await, vec![item("p2", 1)]);

    service
        .set_quantity(&ProductId::new("p2"), -5)
        .await
        .expect("set");
    assert!(service.get().await.is_empty());
}

#[tokio::test]
async fn test_set_quantity_updates_in_place() {
    let guest = FakeGuestStore::with_items(vec![item("p1", 1), item("p2", 2)]);
    let users = FakeUserStore::default();
    let service = guest_service(&guest, &users);

    service
        .set_quantity(&ProductId::new("p2"), 9)
        .await
        .expect("set");

    assert_eq!(service.get().await, vec![item("p1", 1), item("p2", 9)]);
}

#[tokio::test]
async fn test_remove_filters_by_id() {
    let guest = FakeGuestStore::with_items(vec![item("p1", 1), item("p2", 2)]);
    let users = FakeUserStore::default();
    let service = guest_service(&guest, &users);

    service.remove(&ProductId::new("p1")).await.expect("remove");

    assert_eq!(service.get().await, vec![item("p2", 2)]);
}

#[tokio::test]
async fn test_clear_deletes_guest_key() {
    let guest = FakeGuestStore::with_items(vec![item("p1", 1)]);
    let users = FakeUserStore::default();
    let service = guest_service(&guest, &users);

    service.clear().await.expect("clear");

    // Key removed, not stored as an empty list.
    assert_eq!(guest.snapshot(), None);
}

#[tokio::test]
async fn test_clear_writes_empty_list_for_user() {
    let user = uid();
    let guest = FakeGuestStore::default();
    let users = FakeUserStore::with_cart(&user, vec![item("p1", 1)]);
    let service = CartService::new(&guest, &users, Some(user.clone()));

    service.clear().await.expect("clear");

    assert_eq!(users.snapshot(&user), Some(Vec::new()));
}

#[tokio::test]
async fn test_item_count_sums_quantities() {
    let guest = FakeGuestStore::with_items(vec![item("a", 2), item("b", 1), item("c", 3)]);
    let users = FakeUserStore::default();
    let service = guest_service(&guest, &users);

    assert_eq!(service.item_count().await, 6);
}

#[tokio::test]
async fn test_user_write_failure_leaves_stored_cart_intact() {
    let user = uid();
    let guest = FakeGuestStore::default();
    let users = FakeUserStore::with_cart(&user, vec![item("p1", 1)]);
    users.fail_writes.store(true, Ordering::SeqCst);

    let service = CartService::new(&guest, &users, Some(user.clone()));

    // Writes fail loudly...
    assert!(service.save(&[item("p2", 1)]).await.is_err());
    // ...but reads still work and the stored cart is untouched.
    assert_eq!(service.get().await, vec![item("p1", 1)]);
}

// ============================================================================
// Merge
// ============================================================================

#[test]
fn test_merge_additive_for_shared_union_for_disjoint() {
    let remote = vec![item("a", 2)];
    let guest = vec![item("a", 3), item("b", 1)];

    let merged = merge_carts(remote, guest);

    assert_eq!(merged, vec![item("a", 5), item("b", 1)]);
}

#[test]
fn test_merge_keeps_remote_only_items() {
    let remote = vec![item("a", 1), item("b", 2)];
    let guest = vec![item("c", 4)];

    let merged = merge_carts(remote, guest);

    assert_eq!(merged, vec![item("a", 1), item("b", 2), item("c", 4)]);
}

#[test]
fn test_merge_with_empty_sides() {
    assert_eq!(merge_carts(Vec::new(), vec![item("a", 1)]), vec![item("a", 1)]);
    assert_eq!(merge_carts(vec![item("a", 1)], Vec::new()), vec![item("a", 1)]);
    assert!(merge_carts(Vec::new(), Vec::new()).is_empty());
}

// ============================================================================
// Migration
// ============================================================================

#[tokio::test]
async fn test_login_transition_merges_and_clears_guest() {
    let user = uid();
    let guest = FakeGuestStore::with_items(vec![item("a", 3), item("b", 1)]);
    let users = FakeUserStore::with_cart(&user, vec![item("a", 2)]);

    let mut service = guest_service(&guest, &users);
    let outcome = service
        .set_current_user(Some(user.clone()))
        .await
        .expect("migration");

    assert_eq!(
        outcome,
        MigrationOutcome::Merged {
            items: vec![item("a", 5), item("b", 1)]
        }
    );
    assert_eq!(users.snapshot(&user), Some(vec![item("a", 5), item("b", 1)]));
    assert_eq!(guest.snapshot(), None);
}

#[tokio::test]
async fn test_failed_remote_write_preserves_guest_cart() {
    let user = uid();
    let original_guest = vec![item("a", 3), item("b", 1)];
    let guest = FakeGuestStore::with_items(original_guest.clone());
    let users = FakeUserStore::with_cart(&user, vec![item("a", 2)]);
    users.fail_writes.store(true, Ordering::SeqCst);

    let mut service = guest_service(&guest, &users);
    let result = service.set_current_user(Some(user.clone())).await;

    assert!(result.is_err());
    // Guest cart intact, remote cart unchanged.
    assert_eq!(guest.snapshot(), Some(original_guest));
    assert_eq!(users.snapshot(&user), Some(vec![item("a", 2)]));
}

#[tokio::test]
async fn test_unverified_write_preserves_guest_cart() {
    let user = uid();
    let guest = FakeGuestStore::with_items(vec![item("a", 1)]);
    let users = FakeUserStore::with_cart(&user, vec![item("b", 2)]);
    users.drop_writes.store(true, Ordering::SeqCst);

    let mut service = guest_service(&guest, &users);
    let result = service.set_current_user(Some(user.clone())).await;

    assert!(matches!(result, Err(CartError::VerifyFailed)));
    assert_eq!(guest.snapshot(), Some(vec![item("a", 1)]));
}

#[tokio::test]
async fn test_migrated_guest_cart_does_not_resurrect() {
    let user = uid();
    let guest = FakeGuestStore::with_items(vec![item("p1", 1)]);
    let users = FakeUserStore::default();

    let mut service = guest_service(&guest, &users);
    service
        .set_current_user(Some(user.clone()))
        .await
        .expect("migration");

    // Back to guest state (e.g. logout): the old guest items are gone.
    service.set_current_user(None).await.expect("logout");
    assert!(service.get().await.is_empty());
    assert_eq!(guest.snapshot(), None);
}

#[tokio::test]
async fn test_logout_never_migrates() {
    let user = uid();
    let guest = FakeGuestStore::with_items(vec![item("p1", 1)]);
    let users = FakeUserStore::default();

    let mut service = CartService::new(&guest, &users, Some(user.clone()));
    let outcome = service.set_current_user(None).await.expect("logout");

    assert_eq!(outcome, MigrationOutcome::NothingToMigrate);
    assert_eq!(guest.snapshot(), Some(vec![item("p1", 1)]));
    assert_eq!(users.snapshot(&user), None);
}

#[tokio::test]
async fn test_already_authenticated_reload_does_not_migrate() {
    let user = uid();
    let guest = FakeGuestStore::with_items(vec![item("p1", 1)]);
    let users = FakeUserStore::default();

    let mut service = CartService::new(&guest, &users, Some(user.clone()));
    let outcome = service
        .set_current_user(Some(user.clone()))
        .await
        .expect("reload");

    assert_eq!(outcome, MigrationOutcome::NothingToMigrate);
    assert_eq!(guest.snapshot(), Some(vec![item("p1", 1)]));
}

#[tokio::test]
async fn test_empty_guest_cart_migration_is_noop_remotely() {
    let user = uid();
    let guest = FakeGuestStore::default();
    let users = FakeUserStore::default();

    let mut service = guest_service(&guest, &users);
    let outcome = service
        .set_current_user(Some(user.clone()))
        .await
        .expect("migration");

    assert_eq!(outcome, MigrationOutcome::NothingToMigrate);
    // No remote write happened at all.
    assert_eq!(users.snapshot(&user), None);
}

#[tokio::test]
async fn test_end_to_end_guest_add_then_login() {
    let user = uid();
    let guest = FakeGuestStore::default();
    let users = FakeUserStore::default();

    // Guest adds one item.
    let mut service = guest_service(&guest, &users);
    service.add(item("p1", 1)).await.expect("add");

    // Guest logs in with no prior remote cart.
    service
        .set_current_user(Some(user.clone()))
        .await
        .expect("migration");

    // Post-login reads come from the remote store.
    assert_eq!(service.get().await, vec![item("p1", 1)]);
    // The session key is gone.
    assert_eq!(guest.snapshot(), None);
}
