use catalog_cell::{Catalog, EntityId};

use crate::models::BookingState;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub price: f64,
    /// Minutes.
    pub duration: i32,
}

/// Quantity booked for a selected service; always 1 unless per-service
/// quantities are enabled.
pub fn service_quantity(booking: &BookingState, service_id: EntityId, per_service_quantity: bool) -> u32 {
    if per_service_quantity {
        booking.service_quantities.get(&service_id).copied().unwrap_or(1)
    } else {
        1
    }
}

/// Sums selected services and products against the catalog. Products add no
/// duration, and selections the catalog no longer lists contribute nothing.
/// Durations saturate instead of wrapping.
pub fn compute_totals(booking: &BookingState, catalog: &Catalog, per_service_quantity: bool) -> Totals {
    let mut totals = Totals::default();

    for service_id in &booking.selected_service_ids {
        if let Some(service) = catalog.service(*service_id) {
            let qty = service_quantity(booking, *service_id, per_service_quantity);
            totals.price += service.price * f64::from(qty);
            let qty = i32::try_from(qty).unwrap_or(i32::MAX);
            totals.duration = totals.duration.saturating_add(service.duration.saturating_mul(qty));
        }
    }

    for selection in &booking.selected_products {
        if let Some(product) = catalog.product(selection.product_id) {
            totals.price += product.price * f64::from(selection.quantity);
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductSelection;
    use catalog_cell::{Company, Product, Service};

    fn catalog() -> Catalog {
        let service = |id, price, duration| Service {
            id,
            name: format!("Serviço {}", id),
            description: None,
            price,
            duration,
            active: true,
        };
        Catalog {
            company: Company {
                id: 1,
                name: "Barbearia Central".to_string(),
                slug: "central".to_string(),
                phone: None,
                address: None,
            },
            services: vec![service(1, 35.0, 30), service(2, 25.0, 20)],
            products: vec![Product {
                id: 2,
                name: "Pomada".to_string(),
                description: None,
                price: 15.0,
                stock: Some(10),
                image_url: None,
                active: true,
            }],
            professionals: vec![],
        }
    }

    #[test]
    fn test_empty_selection_is_zero() {
        assert_eq!(compute_totals(&BookingState::default(), &catalog(), false), Totals::default());
    }

    #[test]
    fn test_service_and_product() {
        let mut booking = BookingState::default();
        booking.selected_service_ids.insert(1);
        booking.selected_products.push(ProductSelection { product_id: 2, quantity: 1 });

        let totals = compute_totals(&booking, &catalog(), false);
        assert_eq!(totals.price, 50.0);
        assert_eq!(totals.duration, 30);
    }

    #[test]
    fn test_products_multiply_but_add_no_duration() {
        let mut booking = BookingState::default();
        booking.selected_service_ids.extend([1, 2]);
        booking.selected_products.push(ProductSelection { product_id: 2, quantity: 3 });

        let totals = compute_totals(&booking, &catalog(), false);
        assert_eq!(totals.price, 35.0 + 25.0 + 45.0);
        assert_eq!(totals.duration, 50);
    }

    #[test]
    fn test_service_quantity_only_counts_when_enabled() {
        let mut booking = BookingState::default();
        booking.selected_service_ids.insert(1);
        booking.service_quantities.insert(1, 2);

        assert_eq!(compute_totals(&booking, &catalog(), false).price, 35.0);

        let totals = compute_totals(&booking, &catalog(), true);
        assert_eq!(totals.price, 70.0);
        assert_eq!(totals.duration, 60);
    }

    #[test]
    fn test_huge_quantity_never_goes_negative() {
        let mut booking = BookingState::default();
        booking.selected_service_ids.extend([1, 2]);
        booking.service_quantities.insert(1, u32::MAX);

        let totals = compute_totals(&booking, &catalog(), true);
        assert_eq!(totals.duration, i32::MAX);
    }

    #[test]
    fn test_unknown_ids_contribute_nothing() {
        let mut booking = BookingState::default();
        booking.selected_service_ids.insert(99);
        booking.selected_products.push(ProductSelection { product_id: 98, quantity: 4 });

        assert_eq!(compute_totals(&booking, &catalog(), false), Totals::default());
    }
}
