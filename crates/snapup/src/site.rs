// KKTIX selector and URL bindings
//
// Every selector the step handlers touch lives here, so a site markup
// change is a one-file fix. Role selectors use Playwright's `role=`
// selector syntax and stay plain strings, which keeps the probe
// contract free of engine-specific locator types.

/// KKTIX home page, used as the login back-to target when none is given.
pub const HOME_URL: &str = "https://kktix.com/";

/// Sign-in page; `back_to` is appended as a query parameter.
pub const LOGIN_URL: &str = "https://kktix.com/users/sign_in";

// Login form
pub const LOGIN_ACCOUNT_INPUT: &str = "input#user_login.string.required";
pub const LOGIN_PASSWORD_INPUT: &str = "input#user_password.password.required";
pub const LOGIN_SUBMIT: &str = "input.btn.normal.btn-login";

// Event landing page
pub const NEXT_STEP_LINK: &str = "role=link[name=\"下一步\"]";

// Fans-question popup (client-side Q&A gate)
pub const FANS_POPUP_ROOT: &str = ".custom-captcha.ng-scope";
pub const FANS_POPUP: &str = ".captcha.ng-scope";
pub const FANS_QUESTION: &str = ".custom-captcha-inner";
pub const FANS_ANSWER_BOX: &str = "role=textbox[name=\"captcha_answer\"]";

// Ticket selection page
pub const TICKET_LIST: &str = ".ticket-list-wrapper.ng-scope.with-seat";
pub const TICKET_ROW: &str = ".ticket-unit.ng-scope";
pub const TICKET_NAME: &str = ".ticket-name.ng-binding";
pub const TICKET_PRICE: &str = ".ticket-price";
pub const TICKET_SEAT: &str = ".ticket-seat.ng-binding.ng-scope";
pub const TICKET_QUANTITY: &str = ".ticket-quantity.ng-scope";
pub const TICKET_PLUS_BUTTON: &str = "button.btn-default.plus";
pub const AGREE_TERMS_CHECKBOX: &str = "#person_agree_terms";
pub const NEXT_STEP_BUTTON: &str = "role=button[name=\"下一步\"]";

/// Marker KKTIX renders inside the quantity cell of an exhausted row.
pub const SOLD_OUT_MARKER: &str = "已售完";

// Form / payment pages
pub const COUNTDOWN_BLOCK: &str = ".countdown-block.ng-binding.ng-scope";
pub const CART_TICKET_TABLE: &str = ".table.data-list.cart-ticket-list.ng-scope";
pub const CART_TICKET_LIST: &str = ".cart-ticket-list";
pub const CART_SEAT_INFO: &str = ".seat-info.ng-scope";
pub const CART_PRICE_COUNT: &str = ".align-right.price-count.ng-binding";
pub const CART_PRICE_TOTAL: &str = ".align-right.price-total.ng-binding";
pub const CART_TOTAL_AMOUNT: &str = ".highlight";

pub const CONTACT_INFO: &str = ".contact-info";
pub const CONTACT_GROUP: &str = ".control-group";
pub const CONTACT_LABEL: &str = ".control-label.ng-binding";
pub const CONTACT_TEXTBOX: &str = "role=textbox";
pub const INLINE_CHECKBOX: &str = ".checkbox-inline.ng-binding";
pub const CONFIRM_FORM_TEXT: &str = "text=確認表單資料";

// Contact field labels the reconciliation pass recognizes
pub const LABEL_NAME: &str = "姓名";
pub const LABEL_EMAIL: &str = "Email";
pub const LABEL_PHONE: &str = "手機";

pub const ORDER_NUMBER_TITLE: &str = ".final-order-list-title.ng-scope";
pub const PICKUP_PAYMENT_BLOCK: &str = ".pickup-and-payment-block";
pub const PICKUP_BLOCK: &str = ".pickup";
pub const PAYMENT_BLOCK: &str = ".payment";
pub const RADIO_GROUP: &str = ".control-group.radio";
pub const PICKUP_RADIO_LABEL: &str = ".radio.ng-binding";
pub const PAYMENT_RADIO_LABEL: &str = ".radio.payment-method-label.ng-binding";
pub const PICKUP_ID_TEXTBOX: &str = "role=textbox";
pub const FINAL_SUBMIT: &str = ".btn.btn-primary.btn-lg.ng-binding.ng-isolate-scope >> role=button";

/// Active-step indicator in the registration wizard header. Read only
/// for the one URL shape that is ambiguous between form and payment.
pub const ACTIVE_STAGE: &str = ".ng-scope.active";

/// Active-step label markers for the ambiguous registration URL.
pub const STAGE_FORM_MARKER: &str = "填寫表單";
pub const STAGE_PAYMENT_MARKER: &str = "取票繳費";

// URL shapes, ordered: landing is a plain substring probe, the rest are
// anchored regexes evaluated first-match-wins by the classifier.
pub const URL_LANDING_MARKER: &str = "kktix.cc/events/";
pub const URL_TICKET_SELECTION: &str = r"^https://kktix\.com/events/\w*/registrations/new";
pub const URL_BOOKING: &str = r"^https://kktix\.com/events/\w*/registrations/[-#\w]*/booking";
pub const URL_REGISTRATION_STAGE: &str = r"^https://kktix\.com/events/\w*/registrations/[-#\w]*/$";

// Countdown formats: a bare HH:MM remainder on the form page, a full
// date-time deadline on the payment page.
pub const COUNTDOWN_CLOCK: &str = r"([\d-]+:[\d-]+)";
pub const COUNTDOWN_DEADLINE: &str = r"[\d-]{4}/[\d-]{2}/[\d-]{2} [\d-]{2}:[\d-]{2}";
