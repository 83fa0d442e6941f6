//! Shared builders and repository mocks for domain service tests.

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveTime, TimeZone, Utc};
use mockable::Clock;
use mockall::mock;
use pagination::Page;
use uuid::Uuid;

use crate::domain::ports::{OrderRepository, ResourceRepository, ResourceRepositoryError};
use crate::domain::{
    Branch, BranchFields, BusinessCode, Category, CategoryFields, Client, ClientFields, CodeKind,
    ListRequest, Money, Order, OrderDraft, OrderFields, OrderStatus, Product, ProductDraft,
    ProductFields, WorkHour,
};

mock! {
    pub Clients {}

    #[async_trait]
    impl ResourceRepository<Client> for Clients {
        async fn create(&self, draft: &ClientFields) -> Result<Client, ResourceRepositoryError>;
        async fn get_by_id(&self, id: Uuid) -> Result<Client, ResourceRepositoryError>;
        async fn get_list(&self, request: &ListRequest) -> Result<Page<Client>, ResourceRepositoryError>;
        async fn update(&self, id: Uuid, changes: &ClientFields) -> Result<u64, ResourceRepositoryError>;
        async fn delete(&self, id: Uuid) -> Result<(), ResourceRepositoryError>;
    }
}

mock! {
    pub Branches {}

    #[async_trait]
    impl ResourceRepository<Branch> for Branches {
        async fn create(&self, draft: &BranchFields) -> Result<Branch, ResourceRepositoryError>;
        async fn get_by_id(&self, id: Uuid) -> Result<Branch, ResourceRepositoryError>;
        async fn get_list(&self, request: &ListRequest) -> Result<Page<Branch>, ResourceRepositoryError>;
        async fn update(&self, id: Uuid, changes: &BranchFields) -> Result<u64, ResourceRepositoryError>;
        async fn delete(&self, id: Uuid) -> Result<(), ResourceRepositoryError>;
    }
}

mock! {
    pub Categories {}

    #[async_trait]
    impl ResourceRepository<Category> for Categories {
        async fn create(&self, draft: &CategoryFields) -> Result<Category, ResourceRepositoryError>;
        async fn get_by_id(&self, id: Uuid) -> Result<Category, ResourceRepositoryError>;
        async fn get_list(&self, request: &ListRequest) -> Result<Page<Category>, ResourceRepositoryError>;
        async fn update(&self, id: Uuid, changes: &CategoryFields) -> Result<u64, ResourceRepositoryError>;
        async fn delete(&self, id: Uuid) -> Result<(), ResourceRepositoryError>;
    }
}

mock! {
    pub Products {}

    #[async_trait]
    impl ResourceRepository<Product> for Products {
        async fn create(&self, draft: &ProductDraft) -> Result<Product, ResourceRepositoryError>;
        async fn get_by_id(&self, id: Uuid) -> Result<Product, ResourceRepositoryError>;
        async fn get_list(&self, request: &ListRequest) -> Result<Page<Product>, ResourceRepositoryError>;
        async fn update(&self, id: Uuid, changes: &ProductFields) -> Result<u64, ResourceRepositoryError>;
        async fn delete(&self, id: Uuid) -> Result<(), ResourceRepositoryError>;
    }
}

mock! {
    pub Orders {}

    #[async_trait]
    impl ResourceRepository<Order> for Orders {
        async fn create(&self, draft: &OrderDraft) -> Result<Order, ResourceRepositoryError>;
        async fn get_by_id(&self, id: Uuid) -> Result<Order, ResourceRepositoryError>;
        async fn get_list(&self, request: &ListRequest) -> Result<Page<Order>, ResourceRepositoryError>;
        async fn update(&self, id: Uuid, changes: &OrderFields) -> Result<u64, ResourceRepositoryError>;
        async fn delete(&self, id: Uuid) -> Result<(), ResourceRepositoryError>;
    }

    #[async_trait]
    impl OrderRepository for Orders {
        async fn transition_status(
            &self,
            id: Uuid,
            expected: OrderStatus,
            to: OrderStatus,
        ) -> Result<Option<Order>, ResourceRepositoryError>;
    }
}

/// Clock pinned to a local wall-clock time on a fixed date.
pub(crate) struct FixtureClock {
    local_now: DateTime<Local>,
}

impl FixtureClock {
    pub(crate) fn at(hour: u32, minute: u32) -> Self {
        let time = NaiveTime::from_hms_opt(hour, minute, 0).expect("valid fixture time");
        let local_now = Local
            .from_local_datetime(&fixture_timestamp().date_naive().and_time(time))
            .earliest()
            .expect("fixture time exists in the local zone");
        Self { local_now }
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.local_now
    }

    fn utc(&self) -> DateTime<Utc> {
        self.local_now.with_timezone(&Utc)
    }
}

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) fn hour(raw: &str) -> WorkHour {
    WorkHour::parse(raw).expect("fixture hour is valid")
}

pub(crate) fn money(raw: &str) -> Money {
    raw.parse().expect("fixture amount is valid")
}

pub(crate) fn client_fields() -> ClientFields {
    ClientFields {
        first_name: "Aziza".to_owned(),
        last_name: "Karimova".to_owned(),
        phone: "+998901112233".to_owned(),
        photo: String::new(),
        date_of_birth: None,
    }
}

pub(crate) fn client(id: Uuid) -> Client {
    Client {
        id,
        fields: client_fields(),
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}

pub(crate) fn branch_fields(delivery_price: &str) -> BranchFields {
    BranchFields {
        name: "Chilonzor".to_owned(),
        phone: "+998712223344".to_owned(),
        photo: String::new(),
        work_start_hour: hour("09:00"),
        work_end_hour: hour("18:00"),
        address: "Bunyodkor 1".to_owned(),
        delivery_price: money(delivery_price),
        active: true,
    }
}

pub(crate) fn branch(id: Uuid, delivery_price: &str) -> Branch {
    Branch {
        id,
        fields: branch_fields(delivery_price),
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}

pub(crate) fn category(id: Uuid, title: &str) -> Category {
    Category {
        id,
        fields: CategoryFields {
            title: title.to_owned(),
            parent_id: None,
            image: String::new(),
        },
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}

pub(crate) fn product_fields(category_id: Option<Uuid>) -> ProductFields {
    ProductFields {
        title: "Green tea".to_owned(),
        description: "Loose leaf, 100 g".to_owned(),
        price: money("12.50"),
        photo: String::new(),
        category_id,
    }
}

pub(crate) fn product(id: Uuid, category_id: Option<Uuid>) -> Product {
    Product {
        id,
        product_code: BusinessCode::format(CodeKind::Product, 1),
        fields: product_fields(category_id),
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}

pub(crate) fn order_fields(branch_id: Uuid) -> OrderFields {
    OrderFields {
        client_id: Uuid::new_v4(),
        branch_id,
        address: "Navoi 12".to_owned(),
        total_count: 3,
        total_price: money("37.50"),
    }
}

pub(crate) fn order(id: Uuid, status: OrderStatus) -> Order {
    Order {
        id,
        order_code: BusinessCode::format(CodeKind::Order, 1),
        fields: order_fields(Uuid::new_v4()),
        delivery_price: money("5.00"),
        status,
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}
