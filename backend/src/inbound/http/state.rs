//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and depend only on
//! driving ports, so they can be exercised against in-memory adapters.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{OrderStatusCommand, Repositories, ResourceCommand, ResourceQuery};
use crate::domain::{
    Branch, BranchService, Category, Client, Order, OrderLineItem, OrderService, Product,
    ProductCatalogService, Resource, ResourceService,
};

/// Command and query ports for one entity kind.
pub struct ResourcePorts<R: Resource> {
    /// Create, overwrite and delete.
    pub command: Arc<dyn ResourceCommand<R>>,
    /// Fetch and list.
    pub query: Arc<dyn ResourceQuery<R>>,
}

impl<R: Resource> ResourcePorts<R> {
    /// Bundle a command and query port.
    pub fn new(command: Arc<dyn ResourceCommand<R>>, query: Arc<dyn ResourceQuery<R>>) -> Self {
        Self { command, query }
    }

    /// Use one service for both sides.
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: ResourceCommand<R> + ResourceQuery<R> + 'static,
    {
        Self {
            command: service.clone(),
            query: service,
        }
    }
}

impl<R: Resource> Clone for ResourcePorts<R> {
    fn clone(&self) -> Self {
        Self {
            command: Arc::clone(&self.command),
            query: Arc::clone(&self.query),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// `/client` ports.
    pub clients: ResourcePorts<Client>,
    /// `/branch` ports; lists project availability.
    pub branches: ResourcePorts<Branch>,
    /// `/category` ports.
    pub categories: ResourcePorts<Category>,
    /// `/product` ports; lists embed categories.
    pub products: ResourcePorts<Product>,
    /// `/order` CRUD ports.
    pub orders: ResourcePorts<Order>,
    /// `PATCH /order` status transitions.
    pub order_status: Arc<dyn OrderStatusCommand>,
    /// `/order_products` ports.
    pub order_products: ResourcePorts<OrderLineItem>,
}

impl HttpState {
    /// Wire the domain services over `repositories`.
    ///
    /// `clock` supplies the local time used for branch availability.
    pub fn from_repositories(repositories: Repositories, clock: Arc<dyn Clock>) -> Self {
        let Repositories {
            clients,
            branches,
            categories,
            products,
            orders,
            order_products,
            codes,
        } = repositories;

        let branch_command: Arc<dyn ResourceCommand<Branch>> =
            Arc::new(ResourceService::new(branches.clone()));
        let branch_query: Arc<dyn ResourceQuery<Branch>> =
            Arc::new(BranchService::new(branches.clone(), clock));
        let catalog = Arc::new(ProductCatalogService::new(
            products,
            categories.clone(),
            codes.clone(),
        ));
        let order_service = Arc::new(OrderService::new(orders, branches, codes));

        Self {
            clients: ResourcePorts::from_service(Arc::new(ResourceService::new(clients))),
            branches: ResourcePorts::new(branch_command, branch_query),
            categories: ResourcePorts::from_service(Arc::new(ResourceService::new(categories))),
            products: ResourcePorts::from_service(catalog),
            orders: ResourcePorts::from_service(order_service.clone()),
            order_status: order_service,
            order_products: ResourcePorts::from_service(Arc::new(ResourceService::new(
                order_products,
            ))),
        }
    }
}
