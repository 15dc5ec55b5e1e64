use serde_json::json;

pub fn main() {
    env_logger::init();

    let api_key = std::env::var("OUTBOUND_API_KEY").unwrap();
    outbound::init(api_key).unwrap();

    // Attach or update traits of a user.
    outbound::identify("test-user")
        .first_name("Ada")
        .email("ada@example.com")
        .attributes(json!({"plan": "trial"}))
        .on_error(|code, message| eprintln!("identify failed: {code}: {message}"))
        .on_success(|| println!("identified test-user"))
        .send()
        // Outcomes were already reported to the handlers above.
        .ok();

    // Record an event performed by the user.
    let result = outbound::track("test-user", "demo_ran")
        .properties(json!({"source": "demos/simple"}))
        .send();

    println!("Track: {:?}", result);
}
