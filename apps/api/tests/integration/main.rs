mod helpers;
mod test_comments;
mod test_dragons;
mod test_postgres_votes;
mod test_posts;
mod test_smoke_flows;
mod test_votes;
