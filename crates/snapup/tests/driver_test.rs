// Integration tests for the orchestration loop
//
// A scripted page walks the driver through the full checkout sequence
// and the three terminal failure shapes: unknown URL, flow timeout,
// and the indeterminate submit.


use std::sync::Arc;
use std::time::Duration;

use snapup::{Driver, Error, FlowOutcome, Session, TargetCriteria, UserProfile, site};
use stub::{Action, Effect, StubPage};

const LANDING_URL: &str = "https://kklivetw.kktix.cc/events/2024concert";
const NEW_URL: &str = "https://kktix.com/events/2024concert/registrations/new";
const BOOKING_URL: &str = "https://kktix.com/events/2024concert/registrations/abc-123/booking";
const STAGE_URL: &str = "https://kktix.com/events/2024concert/registrations/abc-123/";

fn profile() -> UserProfile {
    UserProfile {
        account: "user@example.com".into(),
        password: "secret".into(),
        name: "王小明".into(),
        email: "user@example.com".into(),
        phone: "0912345678".into(),
        id_number: "A123456789".into(),
    }
}

fn session(page: Arc<StubPage>) -> Session {
    let criteria = TargetCriteria::new(LANDING_URL, "特B", "2800", 2, "全家", "ATM").unwrap();
    Session::new(page, criteria, profile(), Duration::from_millis(1))
}

fn fast_driver() -> Driver {
    Driver::new()
        .with_poll_interval(Duration::from_millis(1))
        .with_flow_budget(Duration::from_secs(5))
}

fn row_part(index: usize, selector: &str) -> String {
    format!("{} >> nth={index} >> {selector}", site::TICKET_ROW)
}

/// Scripts the full site: landing -> ticket selection (visited twice)
/// -> booking -> form -> payment.
fn scripted_site() -> Arc<StubPage> {
    let page = Arc::new(StubPage::new(LANDING_URL));

    // Landing: next-step link enters the registration flow.
    page.attach(site::NEXT_STEP_LINK);
    page.on_click(site::NEXT_STEP_LINK, vec![Effect::Goto(NEW_URL.into())]);

    // Ticket selection: one matching row. The first next-step click is
    // swallowed by the router (URL stays put, handler runs again); the
    // second one lands on the booking page.
    page.attach(site::TICKET_LIST);
    page.set_count(site::TICKET_ROW, 1);
    page.set_text(row_part(0, site::TICKET_NAME), "特B");
    page.set_text(row_part(0, site::TICKET_PRICE), "2,800");
    page.set_text(row_part(0, site::TICKET_SEAT), "3F");
    page.set_text(row_part(0, site::TICKET_QUANTITY), "剩餘 10");
    page.attach(site::NEXT_STEP_BUTTON);
    page.on_click(site::NEXT_STEP_BUTTON, vec![Effect::Goto(NEW_URL.into())]);
    page.on_click(site::NEXT_STEP_BUTTON, vec![Effect::Goto(BOOKING_URL.into())]);

    // Booking auto-assigns seats and moves on without interaction.
    page.after_visit(BOOKING_URL, STAGE_URL);

    // Form stage.
    page.set_text(site::ACTIVE_STAGE, "1. 填寫表單");
    page.set_text(site::COUNTDOWN_BLOCK, "請於 29:59 內確認");
    page.attach(site::CART_TICKET_TABLE);
    page.attach(site::CONTACT_INFO);
    page.set_count(
        &format!("{} >> {}", site::CONTACT_INFO, site::CONTACT_GROUP),
        0,
    );
    page.attach(site::CONFIRM_FORM_TEXT);
    page.on_click(
        site::CONFIRM_FORM_TEXT,
        vec![
            Effect::SetText(site::ACTIVE_STAGE.into(), "2. 取票繳費".into()),
            Effect::SetText(
                site::COUNTDOWN_BLOCK.into(),
                "請於 2024/06/20 23:59 前完成繳費".into(),
            ),
        ],
    );

    // Payment stage.
    page.set_text(site::ORDER_NUMBER_TITLE, "訂單 #20240620-001");
    let pickup_radios = format!(
        "{} >> {} >> {}",
        site::PICKUP_PAYMENT_BLOCK,
        site::PICKUP_BLOCK,
        site::RADIO_GROUP
    );
    page.set_count(&pickup_radios, 2);
    page.set_text(
        format!("{pickup_radios} >> nth=0 >> {}", site::PICKUP_RADIO_LABEL),
        "7-11 取票",
    );
    page.set_text(
        format!("{pickup_radios} >> nth=1 >> {}", site::PICKUP_RADIO_LABEL),
        "全家取票",
    );
    page.attach(format!(
        "{} >> {} >> {}",
        site::PICKUP_PAYMENT_BLOCK,
        site::PICKUP_BLOCK,
        site::PICKUP_ID_TEXTBOX
    ));
    let payment_radios = format!(
        "{} >> {} >> {}",
        site::PICKUP_PAYMENT_BLOCK,
        site::PAYMENT_BLOCK,
        site::RADIO_GROUP
    );
    page.set_count(&payment_radios, 1);
    page.set_text(
        format!("{payment_radios} >> nth=0 >> {}", site::PAYMENT_RADIO_LABEL),
        "atm 轉帳繳費",
    );
    page.attach(site::FINAL_SUBMIT);

    page
}

#[tokio::test]
async fn full_flow_terminates_done_with_handlers_in_order() {
    let page = scripted_site();
    let mut cx = session(Arc::clone(&page));

    let outcome = fast_driver().run(&mut cx).await.expect("run");
    assert_eq!(outcome, FlowOutcome::Completed);

    // Milestone clicks, in flow order, with the ticket page visited
    // twice and payment never repeated.
    let milestones: Vec<String> = page
        .actions()
        .into_iter()
        .filter_map(|a| match a {
            Action::Click(s)
                if s == site::NEXT_STEP_LINK
                    || s == site::NEXT_STEP_BUTTON
                    || s == site::CONFIRM_FORM_TEXT
                    || s == site::FINAL_SUBMIT =>
            {
                Some(s)
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        milestones,
        vec![
            site::NEXT_STEP_LINK.to_string(),
            site::NEXT_STEP_BUTTON.to_string(),
            site::NEXT_STEP_BUTTON.to_string(),
            site::CONFIRM_FORM_TEXT.to_string(),
            site::FINAL_SUBMIT.to_string(),
        ]
    );

    // Order data accumulated across stages.
    assert_eq!(cx.order.form_countdown.as_deref(), Some("29:59"));
    assert_eq!(cx.order.payment_deadline.as_deref(), Some("2024/06/20 23:59"));
    assert_eq!(cx.order.order_number.as_deref(), Some("訂單 #20240620-001"));

    // The pickup method that matched got the national id typed in.
    let typed: Vec<Action> = page
        .actions()
        .into_iter()
        .filter(|a| matches!(a, Action::Type(_, v) if v == "A123456789"))
        .collect();
    assert_eq!(typed.len(), 1);
}

#[tokio::test]
async fn unknown_url_terminates_without_invoking_any_handler() {
    let page = Arc::new(StubPage::new("https://kktix.com/"));
    let mut cx = session(Arc::clone(&page));

    let err = fast_driver().run(&mut cx).await.expect_err("must fail");
    match err {
        Error::UnknownUrl { url } => assert_eq!(url, "https://kktix.com/"),
        other => panic!("expected UnknownUrl, got {other:?}"),
    }
    assert!(page.actions().is_empty(), "no handler may run");
}

#[tokio::test]
async fn flow_budget_expiry_yields_timeout_with_last_state() {
    // Ticket page whose list never attaches: every handler pass fails,
    // the loop keeps reclassifying, and the budget runs out.
    let page = Arc::new(StubPage::new(NEW_URL));
    let mut cx = session(Arc::clone(&page));
    let driver = Driver::new()
        .with_poll_interval(Duration::from_millis(2))
        .with_flow_budget(Duration::from_millis(40));

    let err = driver.run(&mut cx).await.expect_err("must time out");
    match err {
        Error::FlowTimeout { last_state, .. } => {
            assert_eq!(last_state, snapup::LogicalState::TicketSelection);
        }
        other => panic!("expected FlowTimeout, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_stage_waits_instead_of_aborting() {
    // Registration URL with an unreadable step indicator: the loop must
    // keep polling (and eventually time out) rather than abort.
    let page = Arc::new(StubPage::new(STAGE_URL));
    page.set_text(site::ACTIVE_STAGE, "spinner");
    let mut cx = session(Arc::clone(&page));
    let driver = Driver::new()
        .with_poll_interval(Duration::from_millis(2))
        .with_flow_budget(Duration::from_millis(40));

    let err = driver.run(&mut cx).await.expect_err("must time out");
    assert!(matches!(
        err,
        Error::FlowTimeout {
            last_state: snapup::LogicalState::UnknownStage,
            ..
        }
    ));
}

#[tokio::test]
async fn stage_indicator_read_failure_keeps_polling() {
    // The step indicator is attached but its text read fails (the SPA
    // re-rendered between the wait and the read). That miss is
    // transient: the loop must reclassify, not abort with the probe
    // error.
    let page = Arc::new(StubPage::new(STAGE_URL));
    page.attach(site::ACTIVE_STAGE);
    let mut cx = session(Arc::clone(&page));
    let driver = Driver::new()
        .with_poll_interval(Duration::from_millis(2))
        .with_flow_budget(Duration::from_millis(40));

    let err = driver.run(&mut cx).await.expect_err("must time out");
    assert!(
        matches!(err, Error::FlowTimeout { .. }),
        "expected FlowTimeout, got {err:?}"
    );
}

#[tokio::test]
async fn missing_submit_control_ends_indeterminate() {
    // Jump straight to the payment stage with no submit control.
    let page = Arc::new(StubPage::new(STAGE_URL));
    page.set_text(site::ACTIVE_STAGE, "2. 取票繳費");
    page.set_text(site::COUNTDOWN_BLOCK, "請於 2024/06/20 23:59 前完成繳費");
    page.set_text(site::ORDER_NUMBER_TITLE, "訂單 #20240620-001");
    let mut cx = session(Arc::clone(&page));

    let outcome = fast_driver().run(&mut cx).await.expect("run");
    assert_eq!(outcome, FlowOutcome::Indeterminate);
    assert_eq!(page.clicks_on(site::FINAL_SUBMIT), 0);
}
