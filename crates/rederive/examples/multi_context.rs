//! Two isolated contexts, one selector observing both

use rederive::prelude::*;

#[derive(Clone)]
struct Session {
    user: String,
}

#[derive(Clone)]
struct Settings {
    theme: String,
}

fn main() {
    println!("=== rederive Multi-Context Example ===\n");

    let sessions = create_context(Session {
        user: "alice".to_string(),
    });
    let settings = create_context(Settings {
        theme: "dark".to_string(),
    });

    let user = sessions.create_observer(|state: &Session| state.user.clone());
    let theme = settings.create_observer(|state: &Settings| state.theme.clone());

    let banner = {
        let (user, theme) = (user.clone(), theme.clone());
        sessions.create_selector(move |_: &()| format!("{} [{}]", user.call(), theme.call()))
    };

    println!("Banner: {}", banner.call(()));

    // Each recorded dependency replays against its own context's state.
    settings.set_state(Settings {
        theme: "light".to_string(),
    });
    println!("After theme change: {}", banner.call(()));
    println!("Recomputations: {}", banner.recomputations());

    // Writes to a context nothing observed leave the cache warm.
    let scratch = create_context(Session {
        user: "nobody".to_string(),
    });
    scratch.set_state(Session {
        user: "bob".to_string(),
    });
    println!("After unrelated write: {}", banner.call(()));
    println!("Recomputations: {}", banner.recomputations());

    println!("\n=== Example Complete ===");
}
