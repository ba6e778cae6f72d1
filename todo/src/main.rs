//! Todo list demo.
//!
//! Plays a short sequence of UI events against a session and prints the
//! header and list after each one.

use std::sync::Arc;
use todolist::{TodoConfig, TodoCreate, TodoHead, TodoId, TodoList, TodoProvider};
use todolist_core::environment::SystemClock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn render(provider: &TodoProvider, event: &str) {
    println!("\n>>> {event}");
    println!("{}", TodoHead::new(provider).render());
    for line in TodoList::new(provider).render() {
        println!("  {line}");
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todolist=debug,todolist_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    todolist_runtime::metrics::describe_metrics();

    let config = TodoConfig::from_env()?;

    println!("=== Todo List ===");

    TodoProvider::scope(config, Arc::new(SystemClock), |provider| {
        render(provider, "Session started");

        let list = TodoList::new(provider);
        list.toggle(TodoId::new(3))?;
        render(provider, "Clicked \"Context 만들기\"");

        list.remove(TodoId::new(1))?;
        render(provider, "Removed \"프로젝트 생성하기\"");

        let mut form = TodoCreate::new(provider);
        form.toggle_open();
        form.set_value("문서 작성하기");
        if let Some(id) = form.submit()? {
            render(provider, &format!("Created todo {id}"));
        }

        // A stale event handler submitting a tag the store does not know
        if let Err(error) = provider.dispatch().send_json(r#"{"type":"ARCHIVE","id":2}"#) {
            println!("\n>>> Refused raw event: {error}");
        }

        Ok::<_, anyhow::Error>(())
    })?;

    println!("\n=== Session Ended ===");
    Ok(())
}
