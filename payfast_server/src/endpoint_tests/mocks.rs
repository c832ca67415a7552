use mockall::mock;
use payfast_engine::{
    db_types::{NewOrder, NotificationUpdate, Order, PaymentId},
    postback::{PostbackClient, PostbackError, PostbackOutcome},
    signature::FieldSet,
    traits::{OrderManagement, OrderManagementError},
};

mock! {
    pub OrderManager {}
    impl OrderManagement for OrderManager {
        async fn fetch_order(&self, payment_id: &PaymentId) -> Result<Option<Order>, OrderManagementError>;
        async fn fetch_order_by_pf_payment_id(&self, pf_payment_id: &str) -> Result<Option<Order>, OrderManagementError>;
        async fn create_order(&self, order: NewOrder) -> Result<Order, OrderManagementError>;
        async fn get_or_create_order(&self, order: NewOrder) -> Result<(Order, bool), OrderManagementError>;
        async fn save_notification(&self, payment_id: &PaymentId, update: NotificationUpdate) -> Result<Order, OrderManagementError>;
    }
}

mock! {
    pub Postback {}
    impl PostbackClient for Postback {
        async fn confirm(&self, fields: &FieldSet) -> Result<PostbackOutcome, PostbackError>;
    }
}
