//! View synchronization.
//!
//! [`ViewState::derive`] is a pure function of the session: which region is
//! visible, whose name the dashboard shows, and which lists must be loaded.
//! Drawing is left to a [`Renderer`].

use shopfront_core::{Order, Product, Session, UserProfile};

/// Name shown when a token is present without a profile.
pub const FALLBACK_DISPLAY_NAME: &str = "User";

/// A list region of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Products,
    Orders,
}

/// Literal text shown in place of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// A request for the list is in flight.
    Loading,
    /// The order list loaded and is empty.
    NoOrders,
    /// The list could not be loaded.
    Error,
}

impl Placeholder {
    #[must_use]
    pub const fn text(self, region: Region) -> &'static str {
        match (self, region) {
            (Self::Loading, _) => "Loading...",
            (Self::NoOrders, _) => "No orders yet.",
            (Self::Error, Region::Products) => "Error loading products.",
            (Self::Error, Region::Orders) => "Error loading orders.",
        }
    }
}

/// A data load triggered by entering the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Load {
    Products,
    Orders,
}

/// What the UI should show for a given session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Auth region visible, dashboard hidden.
    SignedOut,
    /// Auth region hidden, dashboard visible.
    Dashboard { display_name: String },
}

impl ViewState {
    #[must_use]
    pub fn derive(session: &Session) -> Self {
        Self::from_parts(session.is_authenticated(), session.user())
    }

    fn from_parts(has_token: bool, user: Option<&UserProfile>) -> Self {
        if !has_token {
            return Self::SignedOut;
        }

        let display_name = user.map_or(FALLBACK_DISPLAY_NAME, |user| user.username.as_str());
        Self::Dashboard {
            display_name: display_name.to_owned(),
        }
    }

    /// Loads to run after this state is shown, in order.
    #[must_use]
    pub const fn loads(&self) -> &'static [Load] {
        match self {
            Self::SignedOut => &[],
            Self::Dashboard { .. } => &[Load::Products, Load::Orders],
        }
    }

    /// Show/hide regions on `renderer`.
    pub fn apply<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        match self {
            Self::SignedOut => renderer.show_auth(),
            Self::Dashboard { display_name } => renderer.show_dashboard(display_name),
        }
    }
}

/// Draws the UI. Implemented by the terminal front end and by test recorders.
pub trait Renderer {
    /// Show the auth region and hide the dashboard.
    fn show_auth(&mut self);

    /// Hide the auth region and show the dashboard for `display_name`.
    fn show_dashboard(&mut self, display_name: &str);

    /// Replace the auth region's message line.
    fn auth_message(&mut self, message: &str);

    /// Show a one-off notice (order placed, login required, ...).
    fn notify(&mut self, message: &str);

    /// Replace `region` with a placeholder.
    fn placeholder(&mut self, region: Region, placeholder: Placeholder);

    /// Replace the product list wholesale.
    fn render_products(&mut self, products: &[Product]);

    /// Replace the order list wholesale. Never called with an empty slice.
    fn render_orders(&mut self, orders: &[Order]);
}
