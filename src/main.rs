fn main() {
    careview_lib::run()
}
