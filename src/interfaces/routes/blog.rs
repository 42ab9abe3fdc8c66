use actix_web::web;

use crate::handlers::blog_posts;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/blog")
            .service(
                web::resource("")
                    .route(web::post().to(blog_posts::create_blog_post))
                    .route(web::get().to(blog_posts::get_all_blog_posts))
            )
            .service(
                web::resource("/{slug}")
                    .route(web::get().to(blog_posts::get_blog_post_by_slug))
            )
    );
}
