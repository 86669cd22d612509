/*
 * Responsibility
 * - Public interface of the middleware layer
 * - auth: bearer token -> SecurityContext
 * - cors / http / security_headers: cross-cutting transport concerns
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
