fn main() {
    thumbcache_gen_lib::run()
}
