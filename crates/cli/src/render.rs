//! Terminal renderer.
//!
//! Draws each region as a block of plain text. Output goes to any `Write`
//! (stdout in the binary, a buffer in tests); logs go to stderr separately.

use std::io::{self, Stdout, Write};

use chrono::Local;

use shopfront_client::{Placeholder, Region, Renderer};
use shopfront_core::{Order, Product};

/// Renders the storefront UI as text lines.
pub struct TerminalRenderer<W> {
    out: W,
}

impl TerminalRenderer<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print a usage hint outside any region.
    pub fn hint(&mut self, message: &str) {
        self.line(format_args!("{message}"));
    }

    fn heading(region: Region) -> &'static str {
        match region {
            Region::Products => "Products",
            Region::Orders => "Your orders",
        }
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        // A closed pipe is not worth failing the command over
        if let Err(e) = writeln!(self.out, "{args}") {
            tracing::debug!(error = %e, "Failed to write output");
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn show_auth(&mut self) {
        self.line(format_args!(
            "Not logged in. Use `shopfront login` or `shopfront register`."
        ));
    }

    fn show_dashboard(&mut self, display_name: &str) {
        self.line(format_args!("Logged in as {display_name}"));
    }

    fn auth_message(&mut self, message: &str) {
        self.line(format_args!("{message}"));
    }

    fn notify(&mut self, message: &str) {
        self.line(format_args!("{message}"));
    }

    fn placeholder(&mut self, region: Region, placeholder: Placeholder) {
        // Loading lines would only flash by in a one-shot command
        if placeholder == Placeholder::Loading {
            return;
        }
        let heading = Self::heading(region);
        self.line(format_args!("\n{heading}\n  {}", placeholder.text(region)));
    }

    fn render_products(&mut self, products: &[Product]) {
        self.line(format_args!("\n{}", Self::heading(Region::Products)));
        for product in products {
            self.line(format_args!("  {} ({})", product.name, product.price));
            if !product.description.is_empty() {
                self.line(format_args!("    {}", product.description));
            }
            self.line(format_args!("    Stock: {}", product.stock));
            self.line(format_args!("    Buy 1: shopfront buy {}", product.id));
        }
    }

    fn render_orders(&mut self, orders: &[Order]) {
        self.line(format_args!("\n{}", Self::heading(Region::Orders)));
        for order in orders {
            let placed = order.created_at.with_timezone(&Local);
            self.line(format_args!("  Order #{}", order.id));
            self.line(format_args!("    Status: {}", order.status));
            self.line(format_args!("    Items: {}", order.item_count()));
            self.line(format_args!("    Date: {}", placed.format("%Y-%m-%d %H:%M:%S")));
        }
    }
}
