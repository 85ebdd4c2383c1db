//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口
//! - [`ai`] - AI 经营助手接口
//! - [`categories`] - 分类管理接口
//! - [`suppliers`] - 供应商管理接口
//! - [`products`] - 商品管理接口
//! - [`tables`] - 桌台管理接口
//! - [`reservations`] - 预订管理接口
//! - [`members`] - 会员管理接口
//! - [`orders`] - 订单接口
//! - [`inventory`] - 库存流水接口
//! - [`analytics`] - 销售统计接口

pub mod ai;
pub mod auth;
pub mod health;

// Catalog API
pub mod categories;
pub mod products;
pub mod suppliers;

// Floor API
pub mod reservations;
pub mod tables;

// Customer API
pub mod members;

// Sales and stock API
pub mod analytics;
pub mod inventory;
pub mod orders;
