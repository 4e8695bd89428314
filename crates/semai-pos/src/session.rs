//! # Session State
//!
//! Per-terminal state for one cashier session: the shared cart and the
//! staff identity.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<Cart>>`:
//! 1. Catalog refresh and cart edits can arrive from concurrent handlers
//! 2. Only one of them may mutate the cart at a time
//! 3. Checkout snapshots the lines under the lock, then releases it for
//!    the duration of the database transaction
//!
//! ## Staff Session
//! The old system kept the signed-in user in implicit global auth state.
//! Here it is an explicit [`StaffSession`] value: populated at sign-in,
//! passed to whoever needs it, dropped at sign-out. Role checks gate menus
//! only; they are not a security boundary (that stays server-side).

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use semai_core::{Cart, StaffRole};

// =============================================================================
// Cart State
// =============================================================================

/// Shared, mutex-guarded cart for the terminal session.
#[derive(Debug, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState {
            cart: Arc::new(Mutex::new(Cart::new())),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let subtotal = cart_state.with_cart(|c| c.subtotal(mode));
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().expect("cart mutex poisoned");
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|c| c.add_line(&product))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().expect("cart mutex poisoned");
        f(&mut cart)
    }
}

// =============================================================================
// Staff Session
// =============================================================================

/// The signed-in staff member for this terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffSession {
    /// User id issued by the auth provider.
    pub user_id: String,

    /// Display name for the sidebar footer.
    pub display_name: String,

    pub role: StaffRole,
}

impl StaffSession {
    /// Creates a session after sign-in.
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>, role: StaffRole) -> Self {
        StaffSession {
            user_id: user_id.into(),
            display_name: display_name.into(),
            role,
        }
    }

    /// Whether this session's sidebar shows the given menu.
    pub fn can_access(&self, menu: Menu) -> bool {
        accessible_menus(self.role).contains(&menu)
    }
}

/// Sidebar menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Menu {
    Dashboard,
    Inventory,
    Categories,
    Cashier,
    Invoices,
    Expenses,
    Reports,
    Settings,
}

/// Menus visible to a role. Admin and owner see everything; cashiers get
/// the selling screens.
pub fn accessible_menus(role: StaffRole) -> &'static [Menu] {
    match role {
        StaffRole::Admin | StaffRole::Owner => &[
            Menu::Dashboard,
            Menu::Inventory,
            Menu::Categories,
            Menu::Cashier,
            Menu::Invoices,
            Menu::Expenses,
            Menu::Reports,
            Menu::Settings,
        ],
        StaffRole::Cashier => &[Menu::Dashboard, Menu::Cashier, Menu::Invoices],
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
