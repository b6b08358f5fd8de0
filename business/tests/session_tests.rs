mod common;

use common::{ACCOUNT, MockTransport, TOKEN, mock_ctx, settle};
use dashboard_business::{
    BusinessConfig, CarouselWindow, Greeting, IdentityState, LogoutCommand, LogoutStatus, Session,
    TransportState, build_state_ctx,
};

#[tokio::test]
async fn greeting_follows_the_session() {
    let mut ctx = mock_ctx(MockTransport::responding(200));
    settle(&mut ctx);

    let greeting = ctx.compute::<Greeting>();
    assert_eq!(greeting.display_name, ACCOUNT);
    assert_eq!(greeting.first_name, "Ada");
    assert_eq!(greeting.initial, "A");

    ctx.state_mut::<Session>().account = None;
    settle(&mut ctx);
    assert_eq!(ctx.compute::<Greeting>().display_name, "User");
}

#[tokio::test]
async fn logout_uses_the_session_token_and_runs_once() {
    let transport = MockTransport::responding(200);
    let mut ctx = mock_ctx(transport.clone());

    ctx.enqueue_command::<LogoutCommand>();
    ctx.enqueue_command::<LogoutCommand>();
    ctx.flush_commands();
    assert_eq!(*ctx.compute::<LogoutStatus>(), LogoutStatus::SigningOut);

    while ctx.task_set_mut().join_next().await.is_some() {}
    settle(&mut ctx);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].bearer.as_deref(), Some(TOKEN));
    assert_eq!(requests[0].body, None);
    assert_eq!(
        requests[0].url,
        BusinessConfig::default().logout_url()
    );
    assert_eq!(*ctx.compute::<LogoutStatus>(), LogoutStatus::SignedOut);
    assert_eq!(ctx.compute::<Greeting>().first_name, "User");
}

#[test]
fn context_without_an_account_starts_loading() {
    let identity = IdentityState::new(dashboard_business::EnvIdentity::new(None, None));
    let ctx = build_state_ctx(
        BusinessConfig::default(),
        identity,
        TransportState::new(dashboard_business::HttpTransport),
    );

    assert!(ctx.state::<Session>().is_loading());
    assert_eq!(ctx.state::<Session>().token(), None);
    assert_eq!(ctx.state::<CarouselWindow>().items().len(), 5);
}
