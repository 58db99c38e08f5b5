//! Basic example: observers, selectors and automatic dependency discovery

use rederive::prelude::*;

#[derive(Clone)]
struct Store {
    price: f64,
    quantity: u32,
    currency: String,
}

fn main() {
    println!("=== rederive Basic Example ===\n");

    let ctx = create_context(Store {
        price: 2.5,
        quantity: 4,
        currency: "EUR".to_string(),
    });

    let price = ctx.create_observer(|state: &Store| state.price);
    let quantity = ctx.create_observer(|state: &Store| state.quantity);
    let currency = ctx.create_observer(|state: &Store| state.currency.clone());

    let subtotal = {
        let (price, quantity) = (price.clone(), quantity.clone());
        ctx.create_selector(move |_: &()| price.call() * quantity.call() as f64)
    };

    let label = {
        let (subtotal, currency) = (subtotal.clone(), currency.clone());
        ctx.create_selector(move |_: &()| format!("{:.2} {}", subtotal.call(()), currency.call()))
    };

    println!("Label: {}", label.call(()));
    println!("Label again (cached): {}", label.call(()));
    println!("Recomputations so far: {}", label.recomputations());
    println!("Dependencies: {:?}", label.dependencies(&()));

    // Changing an unobserved field leaves every cache valid.
    println!("\nBumping quantity...");
    ctx.set_state(Store {
        price: 2.5,
        quantity: 10,
        currency: "EUR".to_string(),
    });

    println!("Label: {}", label.call(()));
    println!("Recomputations: {}", label.recomputations());

    // Mocking pins a selector to a canned value.
    println!("\nMocking the subtotal...");
    subtotal.mock(&()).result(100.0);
    label.clear_cache();
    println!("Label with mocked subtotal: {}", label.call(()));

    println!("\n=== Example Complete ===");
}
