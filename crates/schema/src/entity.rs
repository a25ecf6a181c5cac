use std::fmt;
use std::str::FromStr;

use crate::catalog::{self, EntitySchema};
use crate::error::UnknownEntity;

/// Backend collection an admin page operates on.
///
/// The kebab-case [`path`](Self::path) is both the REST path segment and the
/// route segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityType {
	/// Customer feedback about a restaurant.
	Feedbacks,
	/// Menus offered by a restaurant.
	Menus,
	/// Dishes on a menu.
	MenuItems,
	/// Line items of an order.
	OrderItems,
	/// Customer orders.
	Orders,
	/// Table reservations.
	Reservations,
	/// Restaurants.
	Restaurants,
	/// Accounts.
	Users,
}

impl EntityType {
	/// Every entity type, in navigation order.
	pub const ALL: [Self; 8] = [
		Self::Feedbacks,
		Self::Menus,
		Self::MenuItems,
		Self::OrderItems,
		Self::Orders,
		Self::Reservations,
		Self::Restaurants,
		Self::Users,
	];

	/// REST and route path segment.
	pub const fn path(self) -> &'static str {
		match self {
			Self::Feedbacks => "feedbacks",
			Self::Menus => "menus",
			Self::MenuItems => "menu-items",
			Self::OrderItems => "order-items",
			Self::Orders => "orders",
			Self::Reservations => "reservations",
			Self::Restaurants => "restaurants",
			Self::Users => "users",
		}
	}

	/// Human readable page title.
	pub const fn title(self) -> &'static str {
		match self {
			Self::Feedbacks => "Feedbacks",
			Self::Menus => "Menus",
			Self::MenuItems => "Menu Items",
			Self::OrderItems => "Order Items",
			Self::Orders => "Orders",
			Self::Reservations => "Reservations",
			Self::Restaurants => "Restaurants",
			Self::Users => "Users",
		}
	}

	/// Static schema describing this entity's fields.
	pub fn schema(self) -> &'static EntitySchema {
		catalog::schema_for(self)
	}
}

impl fmt::Display for EntityType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.path())
	}
}

impl FromStr for EntityType {
	type Err = UnknownEntity;

	/// Accepts the kebab-case path as well as snake_case spellings.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let normalized = s.trim().trim_matches('/').to_ascii_lowercase().replace('_', "-");
		Self::ALL
			.into_iter()
			.find(|entity| entity.path() == normalized)
			.ok_or_else(|| UnknownEntity(s.to_string()))
	}
}
