//! Las Vegas valley locations, roughly ordered by distance from the Strip.

use tech_dispatch::model::Coordinate;

#[derive(Debug, Clone, Copy)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Customer site in the middle of the Strip.
pub const CUSTOMER_STRIP: Location = Location::new("Bellagio Fountains", 36.1126, -115.1767);

/// Technician home bases, nearest to `CUSTOMER_STRIP` first.
pub const DEPOTS: &[Location] = &[
    Location::new("Caesars Palace", 36.1162, -115.1745),
    Location::new("Paris Las Vegas", 36.1125, -115.1707),
    Location::new("MGM Grand", 36.1024, -115.1695),
    Location::new("Downtown Fremont St", 36.1707, -115.1440),
    Location::new("North Las Vegas Airport", 36.2116, -115.1962),
    Location::new("Summerlin Centre", 36.1527, -115.3301),
    Location::new("Henderson Water St", 36.0333, -114.9822),
    Location::new("Boulder City", 35.9786, -114.8325),
];
