mod helpers;
mod rates;
